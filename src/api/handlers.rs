//! REST API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::auth::JoinedSession;
use super::types::{ApiError, HealthResponse, ListSessionsResponse, SessionCredentials};
use crate::session::{JoinGrant, SessionDirectory, SessionStore, SessionSummary};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub directory: SessionDirectory,
}

impl AppState {
    /// State backed by a fresh in-memory store.
    pub fn new() -> Self {
        Self {
            directory: SessionDirectory::in_memory(),
        }
    }

    /// State backed by the given store.
    pub fn with_store(store: Arc<dyn SessionStore>) -> Self {
        Self {
            directory: SessionDirectory::new(store),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: state.directory.health(),
    })
}

/// List all sessions.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<ListSessionsResponse>, ApiError> {
    let sessions = state.directory.list_sessions().await?;
    Ok(Json(ListSessionsResponse { sessions }))
}

/// Create a new session.
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<SessionCredentials>,
) -> Result<(StatusCode, Json<SessionSummary>), ApiError> {
    req.validate()?;

    let session = state
        .directory
        .create_session(&req.name, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Join a session, returning an access token.
pub async fn join_session(
    State(state): State<AppState>,
    Json(req): Json<SessionCredentials>,
) -> Result<Json<JoinGrant>, ApiError> {
    let grant = state.directory.join_session(&req.name, &req.password).await?;
    Ok(Json(grant))
}

/// The session the caller's token was issued for.
pub async fn current_session(JoinedSession(session): JoinedSession) -> Json<SessionSummary> {
    Json(session.summary())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_new() {
        let state = AppState::new();
        assert_eq!(state.directory.session_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = health(State(AppState::new())).await;
        assert_eq!(response.0.status, "ok");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let req = SessionCredentials {
            name: String::new(),
            password: "pw".into(),
        };
        let err = create_session(State(AppState::new()), Json(req))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_then_join() {
        let state = AppState::new();
        let creds = SessionCredentials {
            name: "room1".into(),
            password: "secret".into(),
        };

        let (status, created) = create_session(State(state.clone()), Json(creds.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.0.name, "room1");

        let grant = join_session(State(state), Json(creds)).await.unwrap();
        assert_eq!(grant.0.id, created.0.id);
    }
}
