//! The operator's admin session.
//!
//! A [`SessionContext`] is created once and shared with every component
//! that talks to the API. It holds the current token in memory and mirrors
//! it to a [`SessionStore`] so that a restart resumes the session.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sleepdash_shared::AdminProfile;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::SessionError;

/// An authenticated operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    /// Bearer token.
    pub token: String,
    /// Operator profile returned at login.
    pub profile: AdminProfile,
    /// When the token stops being accepted, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AdminSession {
    /// Returns true once the token has expired.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Persistence for the admin session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads the stored session, if any.
    async fn load(&self) -> Result<Option<AdminSession>, SessionError>;

    /// Replaces the stored session.
    async fn save(&self, session: &AdminSession) -> Result<(), SessionError>;

    /// Removes the stored session. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), SessionError>;
}

/// Stores the session as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Uses `path`, creating parent directories on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<AdminSession>, SessionError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &AdminSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Keeps the session in memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<AdminSession>>,
}

impl MemorySessionStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<AdminSession>, SessionError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, session: &AdminSession) -> Result<(), SessionError> {
        *self.slot.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock().await = None;
        Ok(())
    }
}

/// The current admin session, shared by the API client and the views.
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<AdminSession>>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    /// An unauthenticated context backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    /// An unauthenticated context that forgets everything on exit.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Restores the stored session.
    ///
    /// An expired or corrupt session is discarded. If the store cannot be
    /// read at all, the stored copy is left alone. Either way the context
    /// stays unauthenticated.
    pub async fn init(&self) -> Option<AdminProfile> {
        let restored = match self.store.load().await {
            Ok(Some(session)) if session.is_expired(Utc::now()) => {
                info!(email = %session.profile.email, "Stored session expired");
                self.discard_stored().await;
                None
            }
            Ok(session) => session,
            Err(e @ SessionError::Corrupt(_)) => {
                warn!(error = %e, "Discarding stored session");
                self.discard_stored().await;
                None
            }
            Err(e @ SessionError::Io(_)) => {
                warn!(error = %e, "Could not read stored session, keeping it");
                None
            }
        };

        let profile = restored.as_ref().map(|s| s.profile.clone());
        if let Some(profile) = &profile {
            debug!(email = %profile.email, "Session restored");
        }
        *self.write() = restored;
        profile
    }

    /// Makes `session` current and persists it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session cannot be stored. The session
    /// is still current in memory.
    pub async fn establish(&self, session: AdminSession) -> Result<(), SessionError> {
        *self.write() = Some(session.clone());
        self.store.save(&session).await
    }

    /// Forgets the session in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the stored copy cannot be removed. The
    /// in-memory session is cleared regardless.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let previous = self.write().take();
        if let Some(session) = previous {
            info!(email = %session.profile.email, "Logged out");
        }
        self.store.clear().await
    }

    /// Bearer token for outgoing requests.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    /// Profile of the signed-in operator.
    #[must_use]
    pub fn profile(&self) -> Option<AdminProfile> {
        self.read().as_ref().map(|s| s.profile.clone())
    }

    /// Returns true while a session is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    async fn discard_stored(&self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Could not remove stored session");
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<AdminSession>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<AdminSession>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}
