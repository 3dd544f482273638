//! API layer for scramble-lobby.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness check, always `{"status":"ok"}`
//! - `GET /sessions` - List all sessions as `{id, name}` pairs
//! - `POST /sessions` - Create a session from `{name, password}`
//! - `POST /sessions/join` - Join with `{name, password}`, receive a token
//! - `GET /sessions/me` - Resolve the caller's token to its session
//!
//! ## Example
//!
//! ```no_run
//! use scramble_lobby::api::{serve, AppState, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> scramble_lobby::Result<()> {
//!     let config = ServerConfig::new("127.0.0.1", 8080);
//!     serve(config, AppState::new()).await
//! }
//! ```

pub mod auth;
pub mod handlers;
pub mod router;
pub mod types;

// Re-export commonly used types
pub use auth::{extract_token, JoinedSession};
pub use handlers::AppState;
pub use router::{
    create_router, create_router_with_config, create_router_with_state, serve, ServerConfig,
};
pub use types::{
    ApiError, ErrorResponse, HealthResponse, ListSessionsResponse, SessionCredentials,
};
