//! Session storage abstraction.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AccessToken, MemoryStore, SessionId, SqliteStore};
use crate::Result;

/// A joinable game room.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Unique identifier, assigned by the store.
    pub id: SessionId,
    /// Unique, case-sensitive room name.
    pub name: String,
    /// Plain-text password required to join.
    pub password: String,
}

impl Session {
    pub fn new(id: SessionId, name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            password: password.into(),
        }
    }

    /// Whether `candidate` is exactly this session's password.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.as_bytes() == candidate.as_bytes()
    }

    /// The public view of this session.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session fields that are safe to show to any client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub name: String,
}

/// Persistence backend for sessions and tokens.
///
/// Implementations must make `create` atomic: two racing creates for the
/// same name yield exactly one success and one [`LobbyError::SessionExists`].
///
/// [`LobbyError::SessionExists`]: crate::LobbyError::SessionExists
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session, allocating the next unused ID.
    async fn create(&self, name: &str, password: &str) -> Result<Session>;

    /// Look up a session by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Session>>;

    /// All sessions in creation order.
    async fn list(&self) -> Result<Vec<Session>>;

    /// Record that `token` was issued for the session called `session_name`.
    async fn insert_token(&self, token: &AccessToken, session_name: &str) -> Result<()>;

    /// Resolve a token to the session it was issued for.
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>>;

    /// Number of stored sessions.
    async fn count(&self) -> Result<usize>;
}

/// Which store implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process memory; everything is lost on restart.
    Memory,
    /// SQLite database file.
    #[default]
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// Settings needed to open a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// SQLite connection URL; ignored by the memory backend.
    pub database_url: String,
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::default()
        }
    }

    pub fn sqlite(database_url: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            database_url: database_url.into(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            database_url: "sqlite://scrambling.db".to_string(),
        }
    }
}

/// Open the configured store.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn SessionStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory session store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Sqlite => {
            tracing::info!("Using SQLite session store at {}", config.database_url);
            let store = SqliteStore::connect(&config.database_url).await?;
            Ok(Arc::new(store))
        }
    }
}
