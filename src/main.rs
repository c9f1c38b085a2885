//! Kerala AI backend — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Resolve effective log level (CLI `-v` flags > env/config) and init logger once
//!   4. Build the store and admin access policy
//!   5. Spawn Ctrl-C → shutdown signal watcher
//!   6. Serve until shutdown

use kerala_ai_backend::{
    api::{self, ApiState, admin},
    config,
    error::AppError,
    logger,
    store::{Store, contact_log::FileContactLog},
};
use tokio_util::sync::CancellationToken;
use tracing::info;

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(args.config_path.as_deref())?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some())?;

    info!(
        bind = %config.server.bind_addr(),
        contact_log = %config.contact_log.display(),
        log_level = %effective_log_level,
        admin_enabled = config.admin_token.is_some(),
        "config loaded"
    );

    let store = Store::seeded(Box::new(FileContactLog::new(&config.contact_log)));
    let state = ApiState::new(store, admin::from_token(config.admin_token.as_deref()));

    let shutdown = CancellationToken::new();

    // Ctrl-C handler — cancels the token so the server drains and exits.
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received — initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    api::serve(&config.server.bind_addr(), state, shutdown).await
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: kerala-ai-backend [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: {})", config::DEFAULT_CONFIG_PATH);
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                println!();
                println!("Environment: PORT, KERALA_HOST, KERALA_LOG_LEVEL, KERALA_CONTACT_LOG, KERALA_ADMIN_TOKEN");
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => {}
        }
    }

    CliArgs {
        log_level: logger::level_for_verbosity(verbosity),
        config_path,
    }
}
