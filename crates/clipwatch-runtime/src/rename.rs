//! Renaming saved clips with retry.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;

use chrono::{DateTime, Utc};
use clipwatch_core::artifact_name;
use clipwatch_models::TriggerRecord;
use thiserror::Error;
use tracing::debug;

use crate::config::RenamePolicy;

/// Moves a clip to its new name.
pub trait ClipMover: Send + Sync + fmt::Debug {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`ClipMover`] backed by `std::fs::rename`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMover;

impl ClipMover for FsMover {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }
}

/// Every rename attempt failed; the clip is still at `from`.
#[derive(Debug, Error)]
#[error("could not rename {} after {attempts} attempts: {source}", .from.display())]
pub struct RenameError {
    pub from: PathBuf,
    pub to: PathBuf,
    pub attempts: u32,
    #[source]
    pub source: io::Error,
}

/// Target path for a clip saved at `source`, named after `record`.
///
/// The clip stays in its directory and keeps its extension.
pub fn target_path(source: &Path, record: &TriggerRecord, at: DateTime<Utc>) -> PathBuf {
    let extension = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let name = artifact_name(&record.chatter, &record.keyword, at, &extension);
    match source.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Renames `from` to `to`, waiting `policy.interval` between failed attempts.
///
/// Blocks the calling thread; never call it from the event loop.
pub fn rename_with_retry(
    mover: &dyn ClipMover,
    from: &Path,
    to: &Path,
    policy: &RenamePolicy,
) -> Result<(), RenameError> {
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match mover.rename(from, to) {
            Ok(()) => return Ok(()),
            Err(source) if attempt >= attempts => {
                return Err(RenameError {
                    from: from.to_path_buf(),
                    to: to.to_path_buf(),
                    attempts,
                    source,
                });
            }
            Err(e) => {
                debug!(attempt, error = %e, path = %from.display(), "Clip busy, retrying rename");
                thread::sleep(policy.interval);
                attempt += 1;
            }
        }
    }
}
