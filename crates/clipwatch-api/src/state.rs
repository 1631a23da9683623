//! Application state shared across handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clipwatch_persistence::SettingsStore;
use clipwatch_runtime::{Coordinator, LoopbackHub};

use crate::config::ApiConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub coordinator: Arc<Coordinator>,
    /// Where `POST /api/config` persists settings.
    pub settings_store: Arc<SettingsStore>,
    /// Directory listed by `GET /api/replays`.
    pub video_dir: Arc<PathBuf>,
    /// Present when chat comes from the in-process loopback feed.
    pub loopback: Option<LoopbackHub>,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        coordinator: Arc<Coordinator>,
        settings_store: SettingsStore,
        video_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            coordinator,
            settings_store: Arc::new(settings_store),
            video_dir: Arc::new(video_dir.into()),
            loopback: None,
        }
    }

    /// Enables message injection through `hub`.
    pub fn with_loopback(mut self, hub: LoopbackHub) -> Self {
        self.loopback = Some(hub);
        self
    }

    pub fn video_dir(&self) -> &Path {
        &self.video_dir
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> (AppState, LoopbackHub) {
    use clipwatch_capture::SimulatedCapture;
    use clipwatch_runtime::CoordinatorConfig;
    use std::time::Duration;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let path = dir.path().to_path_buf();
    std::mem::forget(dir);

    let videos = path.join("videos");
    std::fs::create_dir_all(&videos).unwrap();
    let hub = LoopbackHub::new();
    let coordinator = Coordinator::new(
        CoordinatorConfig::new()
            .without_transcripts()
            .with_rename_policy(2, Duration::from_millis(1)),
        Arc::new(hub.clone()),
        Arc::new(SimulatedCapture::new(&videos)),
    );
    let state = AppState::new(
        ApiConfig::default(),
        Arc::new(coordinator),
        SettingsStore::new(path.join("config.json")),
        videos,
    )
    .with_loopback(hub.clone());
    (state, hub)
}
