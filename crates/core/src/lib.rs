//! Domain types and pure logic for Plexus dashboards.
//!
//! Nothing in this crate performs I/O. The database and HTTP layers depend on
//! it; it depends on neither.

pub mod editor;
pub mod error;
pub mod layout;
pub mod types;
pub mod widget;
