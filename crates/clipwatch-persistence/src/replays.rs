//! Listing of saved replay clips.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{PersistenceError, Result};

/// File extensions treated as replay clips.
pub const REPLAY_EXTENSIONS: [&str; 5] = ["mp4", "mkv", "mov", "flv", "webm"];

/// A clip found in the video directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayFile {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
}

fn is_replay(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| REPLAY_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Lists clips in `dir`, newest first. A missing directory is empty.
pub fn list_replays(dir: &Path) -> Result<Vec<ReplayFile>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let read_err = |source| PersistenceError::ReadError {
        path: dir.to_path_buf(),
        source,
    };

    let mut replays = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if !is_replay(&path) {
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(m) if m.is_file() => m,
            _ => continue,
        };
        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        replays.push(ReplayFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
            size_bytes: metadata.len(),
            modified,
        });
    }

    replays.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
    Ok(replays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn touch(path: &Path, age_secs: u64) {
        let file = File::create(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        assert!(list_replays(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_filters_and_sorts_newest_first() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("old.mp4"), 300);
        touch(&dir.path().join("new.MKV"), 10);
        touch(&dir.path().join("notes.txt"), 0);
        fs::create_dir(dir.path().join("folder.mp4")).unwrap();

        let replays = list_replays(dir.path()).unwrap();
        let names: Vec<_> = replays.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["new.MKV", "old.mp4"]);
    }
}
