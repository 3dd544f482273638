//! Configuration management for scramble-lobby.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::net::IpAddr;
use std::path::Path;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::api::router::DEFAULT_CORS_ORIGIN;
use crate::api::ServerConfig;
use crate::cli::Args;
use crate::session::{StoreBackend, StoreConfig};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerSection,
    /// Session store configuration.
    pub store: StoreSection,
    /// Cross-origin configuration.
    pub cors: CorsSection,
    /// Logging configuration.
    pub logging: LoggingSection,
    /// Problems noticed while loading, reported once logging is up.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Enable graceful shutdown.
    pub graceful_shutdown: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            graceful_shutdown: true,
        }
    }
}

/// Session store section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Which backend to use.
    pub backend: StoreBackend,
    /// SQLite connection URL.
    pub database_url: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        let defaults = StoreConfig::default();
        Self {
            backend: defaults.backend,
            database_url: defaults.database_url,
        }
    }
}

/// CORS section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSection {
    /// The single origin allowed to call the API from a browser.
    pub allowed_origin: String,
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            allowed_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level or filter directive.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Unparseable numeric or backend values are ignored and recorded in
    /// `warnings`.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SCRAMBLE_LOBBY_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("SCRAMBLE_LOBBY_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => self
                    .warnings
                    .push(format!("Ignoring invalid SCRAMBLE_LOBBY_PORT: {}", port)),
            }
        }

        if let Some(backend) = lookup("SCRAMBLE_LOBBY_STORE") {
            match backend.parse() {
                Ok(backend) => self.store.backend = backend,
                Err(e) => self
                    .warnings
                    .push(format!("Ignoring SCRAMBLE_LOBBY_STORE: {}", e)),
            }
        }

        if let Some(url) = lookup("SCRAMBLE_LOBBY_DATABASE_URL") {
            self.store.database_url = url;
        }

        if let Some(origin) = lookup("SCRAMBLE_LOBBY_CORS_ORIGIN") {
            self.cors.allowed_origin = origin;
        }

        if let Some(level) = lookup("SCRAMBLE_LOBBY_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = args.host {
            self.server.host = host.to_string();
        }

        if let Some(port) = args.port {
            self.server.port = port;
        }

        if let Some(backend) = args.store {
            self.store.backend = backend;
        }

        if let Some(ref url) = args.database_url {
            self.store.database_url = url.clone();
        }

        if let Some(ref origin) = args.cors_origin {
            self.cors.allowed_origin = origin.clone();
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Convert to ServerConfig for the API server.
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.server.host.clone()))?;

        let origin = HeaderValue::from_str(&self.cors.allowed_origin)
            .map_err(|_| ConfigError::InvalidOrigin(self.cors.allowed_origin.clone()))?;

        let mut server_config =
            ServerConfig::new(host.to_string(), self.server.port).with_cors_origin(origin);

        if !self.server.graceful_shutdown {
            server_config = server_config.without_graceful_shutdown();
        }

        Ok(server_config)
    }

    /// Settings for opening the session store.
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: self.store.backend,
            database_url: self.store.database_url.clone(),
        }
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Invalid host address.
    InvalidHost(String),
    /// CORS origin is not a valid header value.
    InvalidOrigin(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidHost(host) => write!(f, "invalid host address: {}", host),
            Self::InvalidOrigin(origin) => write!(f, "invalid CORS origin: {}", origin),
        }
    }
}

impl std::error::Error for ConfigError {}
