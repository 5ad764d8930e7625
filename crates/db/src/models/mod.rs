//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row and the request DTOs that feed its repository.

pub mod dashboard;
pub mod layout;
pub mod session;
pub mod user;
pub mod widget;
