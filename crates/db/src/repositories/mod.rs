//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod dashboard_repo;
pub mod layout_repo;
pub mod session_repo;
pub mod user_repo;
pub mod widget_repo;

pub use dashboard_repo::DashboardRepo;
pub use layout_repo::LayoutRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use widget_repo::WidgetRepo;
