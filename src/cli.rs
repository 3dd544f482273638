//! Command-line interface for scramble-lobby.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::session::StoreBackend;

/// Command-line arguments.
///
/// Every setting is optional so that only flags actually given override the
/// config file and environment.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Host address to bind to.
    pub host: Option<IpAddr>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Store backend.
    pub store: Option<StoreBackend>,
    /// SQLite database URL.
    pub database_url: Option<String>,
    /// Allowed CORS origin.
    pub cors_origin: Option<String>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('H') | Long("host") => {
                let value: String = parser.value()?.parse()?;
                result.host = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("host", value))?,
                );
            }
            Short('p') | Long("port") => {
                let value: String = parser.value()?.parse()?;
                result.port = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("port", value))?,
                );
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("store") => {
                let value: String = parser.value()?.parse()?;
                result.store = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("store", value))?,
                );
            }
            Short('d') | Long("database-url") => {
                result.database_url = Some(parser.value()?.parse()?);
            }
            Long("cors-origin") => {
                result.cors_origin = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"scramble-lobby {version}
Session directory backend for a multiplayer word-scramble game

USAGE:
    scramble-lobby [OPTIONS]

OPTIONS:
    -H, --host <ADDR>          Host address to bind [default: 127.0.0.1]
    -p, --port <PORT>          Port to listen on [default: 8080]
    -c, --config <FILE>        Path to configuration file (JSON)
    -s, --store <BACKEND>      Session store: memory or sqlite [default: sqlite]
    -d, --database-url <URL>   SQLite URL [default: sqlite://scrambling.db]
        --cors-origin <URL>    Allowed CORS origin [default: http://localhost:3000]
    -l, --log-level <LVL>      Log level (error, warn, info, debug, trace)
    -h, --help                 Print help
    -V, --version              Print version

ENVIRONMENT VARIABLES:
    SCRAMBLE_LOBBY_HOST          Host address (overrides config)
    SCRAMBLE_LOBBY_PORT          Port number (overrides config)
    SCRAMBLE_LOBBY_STORE         Store backend (overrides config)
    SCRAMBLE_LOBBY_DATABASE_URL  SQLite URL (overrides config)
    SCRAMBLE_LOBBY_CORS_ORIGIN   Allowed CORS origin (overrides config)
    SCRAMBLE_LOBBY_LOG_LEVEL     Log level (overrides config)
    RUST_LOG                     Alternative log level setting

EXAMPLES:
    # Start with defaults (localhost:8080, ./scrambling.db)
    scramble-lobby

    # Throwaway in-memory lobby on all interfaces
    scramble-lobby -H 0.0.0.0 -s memory

    # Start with config file
    scramble-lobby -c /etc/scramble-lobby/config.json
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("scramble-lobby {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
