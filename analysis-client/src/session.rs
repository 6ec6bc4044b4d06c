//! Session persistence: bearer token plus cached user profile.
//!
//! The store is the single owner of the credential. It is explicitly
//! constructed and handed to the [`crate::ApiGateway`]; nothing reads
//! ambient global state. Token and profile live in one file and are
//! written and cleared together, so no partial session can survive.

use crate::types::UserProfile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// The persisted session payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub user: Option<UserProfile>,
}

/// Get the default session file path (`~/.chessevo/session.json`).
pub fn default_session_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chessevo")
        .join("session.json")
}

/// Token + profile store. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<Option<StoredSession>>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// A store with no file backing. Sessions last for the process only.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
            path: None,
        }
    }

    /// A store backed by the given file, loading any session already there.
    pub fn at_path(path: PathBuf) -> Self {
        let existing = load_session_file(&path);
        Self {
            inner: Arc::new(Mutex::new(existing)),
            path: Some(path),
        }
    }

    /// A store backed by the default session file.
    pub fn open_default() -> Self {
        Self::at_path(default_session_path())
    }

    /// The current bearer token, if a session exists.
    pub fn token(&self) -> Option<String> {
        self.inner.lock().unwrap().as_ref().map(|s| s.token.clone())
    }

    /// The cached user profile, if one was stored with the session.
    pub fn user(&self) -> Option<UserProfile> {
        self.inner.lock().unwrap().as_ref().and_then(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.lock().unwrap().is_some()
    }

    /// Store a new session, replacing any existing one.
    pub fn set_session(&self, token: String, user: Option<UserProfile>) {
        let session = StoredSession { token, user };
        *self.inner.lock().unwrap() = Some(session.clone());
        if let Some(path) = &self.path {
            if let Err(e) = save_session_file(path, &session) {
                warn!("failed to persist session to {}: {e}", path.display());
            }
        }
    }

    /// Refresh the cached profile, keeping the current token. No-op when
    /// there is no session to attach it to.
    pub fn update_user(&self, user: UserProfile) {
        let mut guard = self.inner.lock().unwrap();
        if let Some(session) = guard.as_mut() {
            session.user = Some(user);
            let session = session.clone();
            drop(guard);
            if let Some(path) = &self.path {
                if let Err(e) = save_session_file(path, &session) {
                    warn!("failed to persist session to {}: {e}", path.display());
                }
            }
        }
    }

    /// Drop token and profile together. Safe to call on an empty store.
    pub fn clear(&self) {
        *self.inner.lock().unwrap() = None;
        if let Some(path) = &self.path {
            if let Err(e) = remove_session_file(path) {
                warn!("failed to remove session file {}: {e}", path.display());
            }
        }
    }
}

fn load_session_file(path: &PathBuf) -> Option<StoredSession> {
    if !path.exists() {
        return None;
    }
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("failed to read session file {}: {e}", path.display());
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("ignoring malformed session file {}: {e}", path.display());
            None
        }
    }
}

fn save_session_file(path: &PathBuf, session: &StoredSession) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| format!("Failed to create directory: {}", e))?;
    }
    let json = serde_json::to_string_pretty(session)
        .map_err(|e| format!("Failed to serialize session: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write session file: {}", e))?;
    Ok(())
}

fn remove_session_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| format!("Failed to remove session file: {}", e))?;
    }
    Ok(())
}
