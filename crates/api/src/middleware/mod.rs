//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a JWT Bearer token.
//! - [`session::SessionUser`] -- Extracts the caller from the session cookie.

pub mod auth;
pub mod session;
