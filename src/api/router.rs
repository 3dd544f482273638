//! API router configuration.

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tokio::signal;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_session, current_session, health, join_session, list_sessions, AppState,
};
use crate::error::LobbyError;

/// Origin of the development frontend.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Create the API router over a fresh in-memory store.
pub fn create_router() -> Router {
    create_router_with_state(AppState::new())
}

/// Create the API router with custom state and the default CORS origin.
pub fn create_router_with_state(state: AppState) -> Router {
    create_router_with_config(state, &ServerConfig::default())
}

/// Create the API router with custom state and server settings.
pub fn create_router_with_config(state: AppState, config: &ServerConfig) -> Router {
    let session_routes = Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/join", post(join_session))
        .route("/me", get(current_session));

    Router::new()
        .route("/health", get(health))
        .nest("/sessions", session_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config.cors_origin.clone()))
        .with_state(state)
}

/// Credentialed CORS for a single origin.
///
/// Credentials forbid `*` wildcards, so methods and headers are mirrored
/// from the preflight request instead.
fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Stop on Ctrl+C / SIGTERM after in-flight requests finish.
    pub graceful_shutdown: bool,
    /// The one origin allowed to make cross-origin requests.
    pub cors_origin: HeaderValue,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_cors_origin(mut self, origin: HeaderValue) -> Self {
        self.cors_origin = origin;
        self
    }

    pub fn without_graceful_shutdown(mut self) -> Self {
        self.graceful_shutdown = false;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            graceful_shutdown: true,
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
        }
    }
}

/// Start the API server.
pub async fn serve(config: ServerConfig, state: AppState) -> crate::Result<()> {
    let addr = config.bind_address();
    let router = create_router_with_config(state, &config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting scramble-lobby API server on {}", addr);

    let result = if config.graceful_shutdown {
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    } else {
        axum::serve(listener, router).await
    };
    result.map_err(LobbyError::Io)?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.graceful_shutdown);
        assert_eq!(config.cors_origin, DEFAULT_CORS_ORIGIN);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_server_config_custom() {
        let config = ServerConfig::new("0.0.0.0", 9000)
            .with_cors_origin(HeaderValue::from_static("http://example.test"))
            .without_graceful_shutdown();
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.cors_origin, "http://example.test");
        assert!(!config.graceful_shutdown);
    }

    #[test]
    fn test_router_creation() {
        // CorsLayer panics at construction on invalid credential rules
        let _router = create_router();
    }
}
