//! Opaque session tokens and the session cookie.
//!
//! The cookie carries a random UUID v4; only its SHA-256 hex digest is stored
//! server-side so a database leak does not expose live sessions.

use sha2::{Digest, Sha256};
use tower_cookies::cookie::time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::Cookie;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "plexus_sid";

/// Default session lifetime in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Session cookie configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime in hours (default: 24).
    pub expiry_hours: i64,
    /// Whether to set the `Secure` attribute (default: false).
    pub cookie_secure: bool,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                 | Default |
    /// |-------------------------|---------|
    /// | `SESSION_EXPIRY_HOURS`  | `24`    |
    /// | `SESSION_COOKIE_SECURE` | `false` |
    pub fn from_env() -> Self {
        let expiry_hours: i64 = std::env::var("SESSION_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_HOURS.to_string())
            .parse()
            .expect("SESSION_EXPIRY_HOURS must be a valid i64");

        let cookie_secure: bool = std::env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SESSION_COOKIE_SECURE must be true or false");

        Self {
            expiry_hours,
            cookie_secure,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expiry_hours: DEFAULT_EXPIRY_HOURS,
            cookie_secure: false,
        }
    }
}

/// Generate a new session token.
///
/// Returns a tuple of `(plaintext_token, sha256_hex_hash)`. The plaintext goes
/// into the cookie; only the hash should be persisted.
pub fn generate_session_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_session_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a session token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Build the `HttpOnly` session cookie for a freshly issued token.
pub fn session_cookie(token: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(Duration::hours(config.expiry_hours))
        .build()
}

/// A cookie matching [`session_cookie`]'s name and path, for removal.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
