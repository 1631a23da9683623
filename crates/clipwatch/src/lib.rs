//! Clipwatch server: wires settings, the coordinator and the HTTP API together.

pub mod cli;

use std::sync::Arc;

use clipwatch_api::{serve, ApiConfig, AppState};
use clipwatch_capture::SimulatedCapture;
use clipwatch_core::ensure_state_dir;
use clipwatch_models::LogEntry;
use clipwatch_persistence::{atomic::ensure_dir, PersistenceError, SettingsStore};
use clipwatch_runtime::{Coordinator, CoordinatorConfig, LoopbackHub, RuntimeError};
use thiserror::Error;
use tracing::{info, warn};

use crate::cli::Cli;

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub type Result<T> = std::result::Result<T, StartupError>;

/// Builds the shared application state from the command line and the saved
/// settings.
pub fn build_state(cli: &Cli, api_config: ApiConfig) -> Result<AppState> {
    ensure_state_dir()?;
    build_state_with_store(cli, api_config, SettingsStore::at_default_location())
}

/// [`build_state`] with an explicit settings location.
///
/// An unreadable settings file is not fatal: defaults are used and the
/// failure is reported in the operator log.
pub fn build_state_with_store(
    cli: &Cli,
    api_config: ApiConfig,
    store: SettingsStore,
) -> Result<AppState> {
    let (settings, load_error) = store.load();
    info!(
        path = %store.path().display(),
        streams = settings.identities().len(),
        "Loaded configuration"
    );

    let clip_dir = cli.clip_dir();
    ensure_dir(&clip_dir)?;

    let hub = LoopbackHub::new();
    let config = CoordinatorConfig::new()
        .with_capture_endpoint(cli.capture_host.clone(), cli.capture_port);
    let coordinator = Coordinator::new(
        config,
        Arc::new(hub.clone()),
        Arc::new(SimulatedCapture::new(&clip_dir)),
    );
    if let Some(e) = load_error {
        coordinator.log(LogEntry::error(format!("Failed to load config: {e}")));
    }
    coordinator.apply_settings(settings);

    if cli.autostart {
        match coordinator.start_configured() {
            Ok(started) => info!(count = started.len(), "Started configured streams"),
            Err(e) => warn!(error = %e, "Could not start configured streams"),
        }
    }

    Ok(AppState::new(api_config, Arc::new(coordinator), store, clip_dir).with_loopback(hub))
}

/// Runs the HTTP server until it fails.
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.api_config();
    let state = build_state(&cli, config.clone())?;
    serve(config, state).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use clipwatch_core::config::STATE_DIR_ENV;
    use clipwatch_core::Settings;
    use clipwatch_events::LogFilter;
    use clipwatch_models::LogTag;
    use std::ffi::OsString;
    use tempfile::tempdir;

    #[test]
    fn test_build_state_wires_directories() {
        let state_dir = tempdir().unwrap();
        let clips = tempdir().unwrap();
        let clip_dir = clips.path().join("replays");
        std::env::set_var(STATE_DIR_ENV, state_dir.path());

        let cli = Cli::parse_from([
            OsString::from("clipwatch"),
            OsString::from("--clip-dir"),
            clip_dir.clone().into_os_string(),
        ]);
        let state = build_state(&cli, cli.api_config()).unwrap();

        assert_eq!(state.video_dir(), clip_dir.as_path());
        assert!(clip_dir.is_dir());
        assert!(state.loopback.is_some());
        assert!(state.settings_store.path().starts_with(state_dir.path()));
    }

    #[test]
    fn test_unreadable_config_is_reported_in_operator_log() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.json");
        std::fs::write(&config, "{not json").unwrap();
        let cli = Cli::parse_from([
            OsString::from("clipwatch"),
            OsString::from("--clip-dir"),
            dir.path().join("clips").into_os_string(),
        ]);

        let state =
            build_state_with_store(&cli, cli.api_config(), SettingsStore::new(&config)).unwrap();

        let errors: Vec<String> = state
            .coordinator
            .snapshot_logs(&LogFilter::new().with_tag(LogTag::Error))
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Failed to load config: "));
        assert_eq!(state.coordinator.settings(), Settings::default());
    }
}
