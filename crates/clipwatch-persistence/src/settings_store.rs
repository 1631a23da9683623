//! Storage for the operator configuration file.

use std::path::{Path, PathBuf};

use clipwatch_core::Settings;
use tracing::{debug, warn};

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::{PersistenceError, Result};

/// Loads and saves [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `CONFIG_FILE` or `~/.clipwatch/config.json`.
    pub fn at_default_location() -> Self {
        Self::new(clipwatch_core::config_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. `Ok(None)` if it doesn't exist yet.
    pub fn try_load(&self) -> Result<Option<Settings>> {
        read_json_optional(&self.path)
    }

    /// Reads the file, falling back to defaults when it is missing or
    /// unreadable. A read failure is handed back next to the defaults so the
    /// caller can report it.
    pub fn load(&self) -> (Settings, Option<PersistenceError>) {
        match self.try_load() {
            Ok(Some(settings)) => {
                debug!(path = %self.path.display(), "Loaded settings");
                (settings, None)
            }
            Ok(None) => (Settings::default(), None),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to load config, using defaults"
                );
                (Settings::default(), Some(e))
            }
        }
    }

    /// Writes the settings atomically.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        atomic_write_json(&self.path, settings)?;
        debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_returns_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("config.json"));

        assert!(store.try_load().unwrap().is_none());
        let (settings, error) = store.load();
        assert_eq!(settings, Settings::default());
        assert!(error.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("config.json"));
        let settings = Settings::default()
            .with_usernames(vec!["alice".to_string(), "bob".to_string()])
            .with_password("hunter2")
            .with_keywords("lock, ssd")
            .with_notifications(false, 9);

        store.save(&settings).unwrap();

        assert_eq!(store.load().0, settings);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "[[[").unwrap();

        let store = SettingsStore::new(&path);
        assert!(store.try_load().is_err());
        let (settings, error) = store.load();
        assert_eq!(settings, Settings::default());
        assert!(error.is_some());
    }

    #[test]
    fn test_reads_legacy_single_username() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"username": "streamer", "obs_password": "pw", "keywords": "mine"}"#,
        )
        .unwrap();

        let (settings, _) = SettingsStore::new(&path).load();
        assert_eq!(settings.identities().len(), 1);
        assert_eq!(settings.obs_password, "pw");
        assert_eq!(settings.notification_duration, 5);
    }
}
