//! In-process session store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{AccessToken, Session, SessionId, SessionStore};
use crate::error::LobbyError;
use crate::Result;

#[derive(Default)]
struct Inner {
    /// Sessions in creation order.
    sessions: Vec<Session>,
    /// Name to index into `sessions`.
    by_name: HashMap<String, usize>,
    /// Token to session name.
    tokens: HashMap<String, String>,
    /// Last allocated ID, if any.
    last_id: Option<SessionId>,
}

impl Inner {
    fn get(&self, name: &str) -> Option<&Session> {
        self.by_name.get(name).map(|&idx| &self.sessions[idx])
    }
}

/// Thread-safe in-memory storage for sessions and tokens.
///
/// Nothing survives a restart. Each store numbers its sessions from 1.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, name: &str, password: &str) -> Result<Session> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| LobbyError::LockPoisoned)?;

        if inner.by_name.contains_key(name) {
            return Err(LobbyError::SessionExists(name.to_string()));
        }

        let id = inner.last_id.map_or(SessionId::FIRST, |id| id.next());
        let session = Session::new(id, name, password);

        let idx = inner.sessions.len();
        inner.sessions.push(session.clone());
        inner.by_name.insert(name.to_string(), idx);
        inner.last_id = Some(id);

        Ok(session)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Session>> {
        let inner = self.inner.read().map_err(|_| LobbyError::LockPoisoned)?;
        Ok(inner.get(name).cloned())
    }

    async fn list(&self) -> Result<Vec<Session>> {
        let inner = self.inner.read().map_err(|_| LobbyError::LockPoisoned)?;
        Ok(inner.sessions.clone())
    }

    async fn insert_token(&self, token: &AccessToken, session_name: &str) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| LobbyError::LockPoisoned)?;

        if !inner.by_name.contains_key(session_name) {
            return Err(LobbyError::SessionNotFound(session_name.to_string()));
        }

        inner
            .tokens
            .insert(token.as_str().to_string(), session_name.to_string());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>> {
        let inner = self.inner.read().map_err(|_| LobbyError::LockPoisoned)?;
        Ok(inner
            .tokens
            .get(token)
            .and_then(|name| inner.get(name))
            .cloned())
    }

    async fn count(&self) -> Result<usize> {
        let inner = self.inner.read().map_err(|_| LobbyError::LockPoisoned)?;
        Ok(inner.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.create("room1", "pw").await.unwrap();
        let b = store.create("room2", "pw").await.unwrap();

        assert_eq!(a.id, SessionId::FIRST);
        assert_eq!(b.id, SessionId::from_raw(2));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_duplicate_name() {
        let store = MemoryStore::new();
        store.create("room1", "pw").await.unwrap();

        let err = store.create("room1", "other").await.unwrap_err();
        assert!(matches!(err, LobbyError::SessionExists(ref n) if n == "room1"));
        assert_eq!(store.count().await.unwrap(), 1);

        // Original password untouched
        let session = store.find_by_name("room1").await.unwrap().unwrap();
        assert_eq!(session.password, "pw");
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let store = MemoryStore::new();
        store.create("Room", "pw").await.unwrap();
        store.create("room", "pw").await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        assert!(store.find_by_name("ROOM").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_in_creation_order() {
        let store = MemoryStore::new();
        for name in ["zeta", "alpha", "mid"] {
            store.create(name, "pw").await.unwrap();
        }

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn test_token_roundtrip() {
        let store = MemoryStore::new();
        store.create("room1", "pw").await.unwrap();

        let token = AccessToken::generate();
        store.insert_token(&token, "room1").await.unwrap();

        let session = store.find_by_token(token.as_str()).await.unwrap().unwrap();
        assert_eq!(session.name, "room1");
        assert!(store.find_by_token("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_token_for_unknown_session() {
        let store = MemoryStore::new();
        let err = store
            .insert_token(&AccessToken::generate(), "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, LobbyError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_concurrent_creates_same_name() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = vec![];

        for i in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create("contested", &format!("pw{i}")).await
            }));
        }

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
