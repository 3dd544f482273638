//! # scramble-lobby
//!
//! Session directory backend for a multiplayer word-scramble game.
//!
//! Clients create named, password-protected game rooms ("sessions"), list
//! them, and join one by presenting its password, receiving an opaque access
//! token in return. Sessions live either in a SQLite database or in process
//! memory behind the same [`SessionStore`] trait.
//!
//! ## Quick Start
//!
//! ```no_run
//! use scramble_lobby::{SessionDirectory, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> scramble_lobby::Result<()> {
//!     scramble_lobby::logging::try_init().ok();
//!
//!     let store = scramble_lobby::open_store(&StoreConfig::memory()).await?;
//!     let directory = SessionDirectory::new(store);
//!
//!     directory.create_session("room1", "secret").await?;
//!     let grant = directory.join_session("room1", "secret").await?;
//!     println!("Joined session {} with token {:?}", grant.id, grant.token);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use error::{ErrorKind, LobbyError, Result};
pub use session::{
    open_store, AccessToken, JoinGrant, MemoryStore, Session, SessionDirectory, SessionId,
    SessionStore, SessionSummary, SqliteStore, StoreBackend, StoreConfig,
};
