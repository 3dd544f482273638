//! Session directory module.
//!
//! This module provides the game-room registry: session and token types,
//! the [`SessionStore`] abstraction with in-memory and SQLite backends, and
//! the [`SessionDirectory`] service that implements create, list and join.

mod directory;
mod id;
mod memory;
mod sqlite;
mod store;
mod token;

pub use directory::{JoinGrant, SessionDirectory};
pub use id::SessionId;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{
    open_store, Session, SessionStore, SessionSummary, StoreBackend, StoreConfig,
};
pub use token::AccessToken;
