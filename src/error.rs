//! Error types for scramble-lobby.

use thiserror::Error;

/// Main error type for lobby operations.
#[derive(Error, Debug)]
pub enum LobbyError {
    /// A session with the given name already exists.
    #[error("session already exists: {0}")]
    SessionExists(String),

    /// No session with the given name exists.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The supplied password does not match the session's password.
    #[error("incorrect password")]
    IncorrectPassword,

    /// No access token was presented.
    #[error("missing access token")]
    MissingToken,

    /// The presented access token is not known to the store.
    #[error("invalid access token")]
    InvalidToken,

    /// Request data failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Database error from the SQL-backed store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

/// Broad category of a [`LobbyError`], used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Conflict,
    NotFound,
    Unauthorized,
    Invalid,
    Internal,
}

impl LobbyError {
    /// Categorize this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SessionExists(_) => ErrorKind::Conflict,
            Self::SessionNotFound(_) => ErrorKind::NotFound,
            Self::IncorrectPassword | Self::MissingToken | Self::InvalidToken => {
                ErrorKind::Unauthorized
            }
            Self::InvalidInput(_) => ErrorKind::Invalid,
            Self::Database(_) | Self::Io(_) | Self::LockPoisoned => ErrorKind::Internal,
        }
    }
}

/// Convenience Result type for lobby operations.
pub type Result<T> = std::result::Result<T, LobbyError>;
