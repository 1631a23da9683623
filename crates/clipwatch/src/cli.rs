//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::Parser;
use clipwatch_api::{config::DEFAULT_API_PORT, ApiConfig};
use clipwatch_capture::sdk::{DEFAULT_CAPTURE_HOST, DEFAULT_CAPTURE_PORT};
use clipwatch_core::config::STATE_DIR_ENV;

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Clipwatch - save a named replay clip whenever chat says a keyword
#[derive(Parser, Debug)]
#[command(name = "clipwatch")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Host for the HTTP API
    #[arg(long, env = "CLIPWATCH_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the HTTP API
    #[arg(short, long, env = "CLIPWATCH_PORT", default_value_t = DEFAULT_API_PORT)]
    pub port: u16,

    /// Path to state directory (configuration and transcripts)
    #[arg(short, long, env = "CLIPWATCH_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Host of the capture application
    #[arg(long, env = "CAPTURE_HOST", default_value = DEFAULT_CAPTURE_HOST)]
    pub capture_host: String,

    /// Port of the capture application
    #[arg(long, env = "CAPTURE_PORT", default_value_t = DEFAULT_CAPTURE_PORT)]
    pub capture_port: u16,

    /// Directory replay clips are written to (default: platform video directory)
    #[arg(long)]
    pub clip_dir: Option<PathBuf>,

    /// Start monitoring every configured stream at launch
    #[arg(long)]
    pub autostart: bool,

    /// Allowed CORS origin (repeatable; default: any)
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,
}

impl Cli {
    /// Makes `--state-dir` visible to the directory helpers.
    pub fn export_state_dir(&self) {
        if let Some(dir) = &self.state_dir {
            std::env::set_var(STATE_DIR_ENV, dir);
        }
    }

    pub fn clip_dir(&self) -> PathBuf {
        self.clip_dir
            .clone()
            .unwrap_or_else(clipwatch_core::video_dir)
    }

    pub fn api_config(&self) -> ApiConfig {
        let config = ApiConfig::new(self.host.clone(), self.port);
        if self.cors_origins.is_empty() {
            config
        } else {
            config.with_cors_origins(self.cors_origins.clone())
        }
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
