//! Coordinator configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clipwatch_capture::CaptureEndpoint;
use clipwatch_events::DEFAULT_LOG_CAPACITY;

use crate::rename::{ClipMover, FsMover};

/// How save-completed callbacks are paired with triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrelationMode {
    /// A single slot holding the latest trigger. Every callback reads it and
    /// nothing clears it, so a slow save can be named after a newer trigger.
    #[default]
    LastWins,
    /// Pending triggers queue up and each callback takes the oldest one. When
    /// the queue is full the oldest pending trigger is dropped.
    Fifo { capacity: usize },
}

/// Retry schedule for renaming a saved clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenamePolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Wait between attempts.
    pub interval: Duration,
}

impl Default for RenamePolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            interval: Duration::from_millis(500),
        }
    }
}

/// Configuration for the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Where the capture application listens.
    pub capture_endpoint: CaptureEndpoint,
    pub rename: RenamePolicy,
    /// Entries kept in the operator log.
    pub log_capacity: usize,
    /// Directory for chat transcripts. `None` disables them.
    pub transcript_dir: Option<PathBuf>,
    pub correlation: CorrelationMode,
    /// Performs clip renames.
    pub clip_mover: Arc<dyn ClipMover>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            capture_endpoint: CaptureEndpoint::default(),
            rename: RenamePolicy::default(),
            log_capacity: DEFAULT_LOG_CAPACITY,
            transcript_dir: Some(clipwatch_core::transcripts_dir()),
            correlation: CorrelationMode::default(),
            clip_mover: Arc::new(FsMover),
        }
    }
}

impl CoordinatorConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capture_endpoint(mut self, host: impl Into<String>, port: u16) -> Self {
        self.capture_endpoint = CaptureEndpoint {
            host: host.into(),
            port,
        };
        self
    }

    pub fn with_rename_policy(mut self, attempts: u32, interval: Duration) -> Self {
        self.rename = RenamePolicy { attempts, interval };
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn with_transcript_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.transcript_dir = Some(dir.into());
        self
    }

    pub fn without_transcripts(mut self) -> Self {
        self.transcript_dir = None;
        self
    }

    pub fn with_correlation(mut self, mode: CorrelationMode) -> Self {
        self.correlation = mode;
        self
    }

    pub fn with_clip_mover(mut self, mover: Arc<dyn ClipMover>) -> Self {
        self.clip_mover = mover;
        self
    }
}
