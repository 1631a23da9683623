//! Clipwatch entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use clipwatch::cli::Cli;

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));
    fmt().with_env_filter(filter).with_target(false).init();

    // Directory helpers read this once, so it must be set before any of them run.
    cli.export_state_dir();

    let result = tokio::runtime::Runtime::new()
        .map_err(clipwatch::StartupError::from)
        .and_then(|runtime| runtime.block_on(clipwatch::run(cli)));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
