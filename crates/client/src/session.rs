//! Client-side session state.
//!
//! The bearer token, the signed-in user and the colour theme live in a
//! [`ClientSession`], which reads and writes them through a pluggable
//! [`SessionStore`]. Nothing is kept in globals.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::models::{AuthResponse, User};

/// UI colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Everything a client persists between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default)]
    pub theme: Theme,
}

/// Where a [`ClientSession`] keeps its state.
pub trait SessionStore {
    fn load(&self) -> Result<Option<StoredSession>, ClientError>;
    fn save(&self, session: &StoredSession) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Process-local store. State is lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, ClientError> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), ClientError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>, ClientError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Explicit session context for one client.
#[derive(Debug)]
pub struct ClientSession<S> {
    store: S,
}

impl<S: SessionStore> ClientSession<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn current(&self) -> Result<StoredSession, ClientError> {
        Ok(self.store.load()?.unwrap_or_default())
    }

    pub fn token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.current()?.token)
    }

    pub fn user(&self) -> Result<Option<User>, ClientError> {
        Ok(self.current()?.user)
    }

    pub fn is_signed_in(&self) -> Result<bool, ClientError> {
        Ok(self.current()?.token.is_some())
    }

    /// Remember the token and user from a signup or login.
    pub fn sign_in(&self, auth: &AuthResponse) -> Result<(), ClientError> {
        let mut session = self.current()?;
        session.token = Some(auth.token.clone());
        session.user = Some(auth.user.clone());
        self.store.save(&session)
    }

    /// Forget the token and user. The theme is kept.
    pub fn sign_out(&self) -> Result<(), ClientError> {
        let session = self.current()?;
        if session.theme == Theme::default() {
            return self.store.clear();
        }
        self.store.save(&StoredSession {
            theme: session.theme,
            ..StoredSession::default()
        })
    }

    pub fn theme(&self) -> Result<Theme, ClientError> {
        Ok(self.current()?.theme)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), ClientError> {
        let mut session = self.current()?;
        session.theme = theme;
        self.store.save(&session)
    }

    /// Flip between light and dark. Returns the new theme.
    pub fn toggle_theme(&self) -> Result<Theme, ClientError> {
        let theme = self.theme()?.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}
