use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::api::types::LoginResponse;
use crate::workflows::{Role, Viewer};

/// Errors that can occur while persisting the session
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Authenticated user context. Created on login, dropped on logout, and
/// handed explicitly to everything that needs to know who is acting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub roles: BTreeSet<Role>,
    pub display_name: String,
    /// Origin department pre-filled on new requests
    #[serde(default)]
    pub default_department: Option<String>,
}

impl Session {
    pub fn from_login(response: LoginResponse, default_department: Option<String>) -> Self {
        let roles = response
            .roles
            .iter()
            .filter_map(|raw| match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!(role = %raw, "Ignoring role from login response: {}", e);
                    None
                }
            })
            .collect();

        Self {
            token: response.token,
            user_id: response.user_id,
            roles,
            display_name: response.display_name,
            default_department,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::new(self.user_id.clone(), self.roles.iter().copied())
    }
}

/// `true` when a session exists
pub fn is_logged_in(session: Option<&Session>) -> bool {
    session.is_some()
}

/// Where the session lives between invocations
#[async_trait]
pub trait SessionPersistence: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, PersistenceError>;
    async fn save(&self, session: &Session) -> Result<(), PersistenceError>;
    /// Remove everything; a later `load` returns `None`
    async fn clear(&self) -> Result<(), PersistenceError>;
}

/// JSON file on disk
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

#[async_trait]
impl SessionPersistence for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, PersistenceError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let session = serde_json::from_str(&content)?;
                debug!(path = %self.path.display(), "Loaded session");
                Ok(Some(session))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content).await?;
        info!(user_id = %session.user_id, path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, used by tests and embedders
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SessionPersistence for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, PersistenceError> {
        Ok(self.slot().clone())
    }

    async fn save(&self, session: &Session) -> Result<(), PersistenceError> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        *self.slot() = None;
        Ok(())
    }
}
