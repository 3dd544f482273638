//! API request and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, LobbyError};
use crate::session::SessionSummary;

/// Body of `POST /sessions` and `POST /sessions/join`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionCredentials {
    pub name: String,
    pub password: String,
}

impl SessionCredentials {
    /// Reject blank names and passwords before they reach the directory.
    pub fn validate(&self) -> Result<(), LobbyError> {
        if self.name.is_empty() {
            return Err(LobbyError::InvalidInput("name must not be empty".into()));
        }
        if self.password.is_empty() {
            return Err(LobbyError::InvalidInput(
                "password must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Response for `GET /sessions`.
#[derive(Debug, Clone, Serialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

/// Generic API error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "SESSION_NOT_FOUND").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Same text as `message`, under the key browser clients read.
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code.into(),
            detail: message.clone(),
            message,
        }
    }

    pub fn session_exists() -> Self {
        Self::new("SESSION_EXISTS", "Session already exists")
    }

    pub fn session_not_found() -> Self {
        Self::new("SESSION_NOT_FOUND", "Session not found")
    }

    pub fn incorrect_password() -> Self {
        Self::new("INCORRECT_PASSWORD", "Incorrect password")
    }

    pub fn invalid_token() -> Self {
        Self::new("INVALID_TOKEN", "Invalid or missing token")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl From<LobbyError> for ApiError {
    fn from(err: LobbyError) -> Self {
        let (status, body) = match (&err, err.kind()) {
            (_, ErrorKind::Conflict) => (StatusCode::BAD_REQUEST, ErrorResponse::session_exists()),
            (_, ErrorKind::NotFound) => (StatusCode::NOT_FOUND, ErrorResponse::session_not_found()),
            (LobbyError::IncorrectPassword, _) => {
                (StatusCode::UNAUTHORIZED, ErrorResponse::incorrect_password())
            }
            (_, ErrorKind::Unauthorized) => {
                (StatusCode::UNAUTHORIZED, ErrorResponse::invalid_token())
            }
            (LobbyError::InvalidInput(msg), _) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::bad_request(msg.clone()),
            ),
            _ => {
                tracing::error!("Request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal_error(),
                )
            }
        };

        Self { status, body }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_parse() {
        let json = r#"{"name": "room1", "password": "secret"}"#;
        let creds: SessionCredentials = serde_json::from_str(json).unwrap();
        assert_eq!(creds.name, "room1");
        assert_eq!(creds.password, "secret");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_credentials_missing_field() {
        let result = serde_json::from_str::<SessionCredentials>(r#"{"name": "room1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_credentials_blank_rejected() {
        let creds = SessionCredentials {
            name: String::new(),
            password: "pw".into(),
        };
        assert!(matches!(creds.validate(), Err(LobbyError::InvalidInput(_))));

        let creds = SessionCredentials {
            name: "room1".into(),
            password: String::new(),
        };
        assert!(matches!(creds.validate(), Err(LobbyError::InvalidInput(_))));
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (LobbyError::SessionExists("a".into()), StatusCode::BAD_REQUEST),
            (LobbyError::SessionNotFound("a".into()), StatusCode::NOT_FOUND),
            (LobbyError::IncorrectPassword, StatusCode::UNAUTHORIZED),
            (LobbyError::MissingToken, StatusCode::UNAUTHORIZED),
            (LobbyError::InvalidToken, StatusCode::UNAUTHORIZED),
            (
                LobbyError::InvalidInput("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (LobbyError::LockPoisoned, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_internal_error_hides_details() {
        let io = std::io::Error::other("disk on fire");
        let api = ApiError::from(LobbyError::Io(io));
        let json = serde_json::to_string(&api.body).unwrap();
        assert!(!json.contains("disk on fire"));
        assert!(json.contains("INTERNAL_ERROR"));
    }

    #[test]
    fn test_error_body_carries_detail() {
        let body = serde_json::to_value(ErrorResponse::session_exists()).unwrap();
        assert_eq!(body["code"], "SESSION_EXISTS");
        assert_eq!(body["message"], "Session already exists");
        assert_eq!(body["detail"], "Session already exists");
    }
}
