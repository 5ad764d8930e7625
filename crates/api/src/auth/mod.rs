//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- bearer token generation and validation.
//! - [`session`] -- opaque session tokens and the session cookie.

pub mod jwt;
pub mod password;
pub mod session;
