//! scramble-lobby binary entry point.

use std::process::ExitCode;

use scramble_lobby::api::{self, AppState};
use scramble_lobby::cli::{self, Args};
use scramble_lobby::config::Config;
use scramble_lobby::{logging, open_store};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(args)?;
    logging::init_with_filter(config.log_filter())?;
    for warning in &config.warnings {
        warn!("{}", warning);
    }

    info!("scramble-lobby v{}", env!("CARGO_PKG_VERSION"));

    let server_config = config.to_server_config()?;
    let store = open_store(&config.to_store_config()).await?;
    info!("Session store ready");

    api::serve(server_config, AppState::with_store(store)).await?;
    Ok(())
}
