/// Errors from the Plexus client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        /// The server's `error` message, or the raw body if it had none.
        message: String,
    },

    /// The session store could not be read or written.
    #[error("Session store error: {0}")]
    Store(#[from] std::io::Error),

    /// The session file holds something other than a stored session.
    #[error("Session store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A protected call was made without a bearer token.
    #[error("Not signed in")]
    NotAuthenticated,
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The caller has no valid credentials: not signed in, or rejected with 401.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::NotAuthenticated) || self.status() == Some(401)
    }
}
