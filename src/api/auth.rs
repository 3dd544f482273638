//! Bearer token extraction.
//!
//! A client that joined a session identifies itself on later requests with
//! either a `token: <value>` header or `Authorization: Bearer <value>`.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::handlers::AppState;
use super::types::ApiError;
use crate::session::Session;

/// Header carrying the raw access token.
pub const TOKEN_HEADER: &str = "token";

/// Auth scheme accepted in the `Authorization` header, matched case-insensitively.
pub const BEARER_SCHEME: &str = "Bearer";

/// Pull the access token out of request headers.
///
/// The dedicated `token` header wins over `Authorization`.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(value.trim().to_string());
    }

    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    Some(token.trim().to_string())
}

/// Extractor resolving the request's token to the session it was issued for.
///
/// Rejects with 401 when the token is missing or unknown.
#[derive(Debug, Clone)]
pub struct JoinedSession(pub Session);

impl FromRequestParts<AppState> for JoinedSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers);
        let session = state.directory.resolve_token(token.as_deref()).await?;
        Ok(Self(session))
    }
}
