//! Plexus presentation layer.
//!
//! A typed HTTP client for the Plexus API, an explicit session context with a
//! pluggable token store, and an editor session that loads, mutates and saves
//! a dashboard layout. Visual rendering is left to the caller; the editor
//! hands out render-ready [`WidgetDescriptor`](plexus_core::layout::WidgetDescriptor)s.

pub mod api;
pub mod editor;
pub mod error;
pub mod models;
pub mod session;

pub use api::ApiClient;
pub use editor::EditorSession;
pub use error::ClientError;
pub use session::{ClientSession, FileSessionStore, MemorySessionStore, SessionStore};
