//! The session directory: create, list and join game rooms.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{AccessToken, MemoryStore, Session, SessionId, SessionStore, SessionSummary};
use crate::error::LobbyError;
use crate::Result;

/// Proof of a successful join.
#[derive(Debug, Clone, Serialize)]
pub struct JoinGrant {
    pub id: SessionId,
    pub name: String,
    pub token: AccessToken,
}

/// Registry of named sessions over an injected [`SessionStore`].
#[derive(Clone)]
pub struct SessionDirectory {
    store: Arc<dyn SessionStore>,
}

impl SessionDirectory {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// A directory backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Liveness check. Does not touch the store.
    pub fn health(&self) -> &'static str {
        "ok"
    }

    /// Every session, in creation order.
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let sessions = self.store.list().await?;
        debug!("Listing {} sessions", sessions.len());
        Ok(sessions.iter().map(Session::summary).collect())
    }

    /// Register a new session.
    ///
    /// Fails with [`LobbyError::SessionExists`] if the name is taken.
    pub async fn create_session(&self, name: &str, password: &str) -> Result<SessionSummary> {
        let session = self.store.create(name, password).await?;
        info!("Session {} created: {}", session.id, session.name);
        Ok(session.summary())
    }

    /// Join a session by name and password, minting a new access token.
    pub async fn join_session(&self, name: &str, password: &str) -> Result<JoinGrant> {
        let session = self
            .store
            .find_by_name(name)
            .await?
            .ok_or_else(|| LobbyError::SessionNotFound(name.to_string()))?;

        if !session.password_matches(password) {
            warn!("Rejected join for session {}: incorrect password", session.id);
            return Err(LobbyError::IncorrectPassword);
        }

        let token = AccessToken::generate();
        self.store.insert_token(&token, &session.name).await?;
        info!("Client joined session {}: {}", session.id, session.name);

        Ok(JoinGrant {
            id: session.id,
            name: session.name,
            token,
        })
    }

    /// Resolve a bearer token to the session it was issued for.
    pub async fn resolve_token(&self, token: Option<&str>) -> Result<Session> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(LobbyError::MissingToken)?;

        self.store
            .find_by_token(token)
            .await?
            .ok_or(LobbyError::InvalidToken)
    }

    /// Number of registered sessions.
    pub async fn session_count(&self) -> Result<usize> {
        self.store.count().await
    }
}

impl Default for SessionDirectory {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SqliteStore;
    use std::collections::HashSet;

    async fn directories() -> Vec<SessionDirectory> {
        vec![
            SessionDirectory::in_memory(),
            SessionDirectory::new(Arc::new(SqliteStore::in_memory().await.unwrap())),
        ]
    }

    #[test]
    fn test_health() {
        assert_eq!(SessionDirectory::in_memory().health(), "ok");
    }

    #[tokio::test]
    async fn test_create_then_list() {
        for dir in directories().await {
            let created = dir.create_session("room1", "secret").await.unwrap();
            assert_eq!(created.id, SessionId::FIRST);
            assert_eq!(created.name, "room1");

            let listed = dir.list_sessions().await.unwrap();
            assert_eq!(listed.iter().filter(|s| s.name == "room1").count(), 1);
        }
    }

    #[tokio::test]
    async fn test_create_twice_conflicts() {
        for dir in directories().await {
            dir.create_session("room1", "secret").await.unwrap();
            let err = dir.create_session("room1", "different").await.unwrap_err();

            assert!(matches!(err, LobbyError::SessionExists(_)));
            assert_eq!(dir.session_count().await.unwrap(), 1);
        }
    }

    #[tokio::test]
    async fn test_join_unknown_session() {
        for dir in directories().await {
            let err = dir.join_session("nowhere", "anything").await.unwrap_err();
            assert!(matches!(err, LobbyError::SessionNotFound(_)));
        }
    }

    #[tokio::test]
    async fn test_join_wrong_password() {
        for dir in directories().await {
            dir.create_session("room1", "secret").await.unwrap();
            let err = dir.join_session("room1", "SECRET").await.unwrap_err();
            assert!(matches!(err, LobbyError::IncorrectPassword));
        }
    }

    #[tokio::test]
    async fn test_join_issues_distinct_tokens() {
        for dir in directories().await {
            dir.create_session("room1", "secret").await.unwrap();

            let mut tokens = HashSet::new();
            for _ in 0..5 {
                let grant = dir.join_session("room1", "secret").await.unwrap();
                assert_eq!(grant.id, SessionId::FIRST);
                assert_eq!(grant.name, "room1");
                assert!(!grant.token.as_str().is_empty());
                assert!(tokens.insert(grant.token));
            }
        }
    }

    #[tokio::test]
    async fn test_resolve_token() {
        for dir in directories().await {
            dir.create_session("room1", "secret").await.unwrap();
            let grant = dir.join_session("room1", "secret").await.unwrap();

            let session = dir.resolve_token(Some(grant.token.as_str())).await.unwrap();
            assert_eq!(session.name, "room1");

            assert!(matches!(
                dir.resolve_token(None).await.unwrap_err(),
                LobbyError::MissingToken
            ));
            assert!(matches!(
                dir.resolve_token(Some("")).await.unwrap_err(),
                LobbyError::MissingToken
            ));
            assert!(matches!(
                dir.resolve_token(Some("bogus")).await.unwrap_err(),
                LobbyError::InvalidToken
            ));
        }
    }

    #[tokio::test]
    async fn test_list_never_leaks_passwords() {
        let dir = SessionDirectory::in_memory();
        dir.create_session("room1", "topsecret").await.unwrap();

        let json = serde_json::to_string(&dir.list_sessions().await.unwrap()).unwrap();
        assert!(!json.contains("topsecret"));
    }
}
