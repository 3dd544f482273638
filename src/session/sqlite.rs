//! SQLite-backed session store.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::debug;

use super::{AccessToken, Session, SessionId, SessionStore};
use crate::error::LobbyError;
use crate::Result;

const CREATE_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT    NOT NULL UNIQUE,
    password TEXT    NOT NULL
)"#;

const CREATE_TOKENS: &str = r#"
CREATE TABLE IF NOT EXISTS tokens (
    token        TEXT PRIMARY KEY,
    session_name TEXT NOT NULL REFERENCES sessions(name)
)"#;

#[derive(FromRow)]
struct SessionRow {
    id: i64,
    name: String,
    password: String,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session::new(SessionId::from_raw(row.id), row.name, row.password)
    }
}

/// Session store persisted in a SQLite database.
///
/// `AUTOINCREMENT` keeps IDs from ever being reused, and the `UNIQUE`
/// constraint on `name` makes concurrent creates race-free.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url` (e.g. `sqlite://scrambling.db` or `sqlite::memory:`),
    /// creating the database file and schema when missing.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` opens its own database, so the pool
        // must hold exactly one connection and never recycle it.
        let pool = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// A private, empty in-memory database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_SESSIONS).execute(&self.pool).await?;
        sqlx::query(CREATE_TOKENS).execute(&self.pool).await?;
        debug!("SQLite schema ready");
        Ok(())
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn create(&self, name: &str, password: &str) -> Result<Session> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO sessions (name, password) VALUES (?, ?) RETURNING id",
        )
        .bind(name)
        .bind(password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                LobbyError::SessionExists(name.to_string())
            }
            other => LobbyError::Database(other),
        })?;

        Ok(Session::new(SessionId::from_raw(id), name, password))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, name, password FROM sessions WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Session::from))
    }

    async fn list(&self) -> Result<Vec<Session>> {
        let rows = sqlx::query_as::<_, SessionRow>(
            "SELECT id, name, password FROM sessions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Session::from).collect())
    }

    async fn insert_token(&self, token: &AccessToken, session_name: &str) -> Result<()> {
        sqlx::query("INSERT INTO tokens (token, session_name) VALUES (?, ?)")
            .bind(token.as_str())
            .bind(session_name)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    LobbyError::SessionNotFound(session_name.to_string())
                }
                other => LobbyError::Database(other),
            })?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"SELECT s.id, s.name, s.password
               FROM tokens t
               JOIN sessions s ON s.name = t.session_name
               WHERE t.token = ?"#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Session::from))
    }

    async fn count(&self) -> Result<usize> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await?;
        let count = usize::try_from(count).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(count)
    }
}
