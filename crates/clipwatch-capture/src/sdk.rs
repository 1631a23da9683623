//! Boundary traits for capture application SDKs.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;

/// Default control host of the capture application.
pub const DEFAULT_CAPTURE_HOST: &str = "localhost";

/// Default control port of the capture application.
pub const DEFAULT_CAPTURE_PORT: u16 = 4455;

/// Callback for "replay saved" events.
///
/// Invoked on a thread owned by the SDK, with the path of the written file.
pub type ReplaySavedHandler = Arc<dyn Fn(PathBuf) + Send + Sync>;

/// Where the capture application listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEndpoint {
    pub host: String,
    pub port: u16,
}

impl Default for CaptureEndpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_CAPTURE_HOST.to_string(),
            port: DEFAULT_CAPTURE_PORT,
        }
    }
}

impl fmt::Display for CaptureEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Request connection to the capture application.
pub trait CaptureRequests: Send + Sync {
    /// Returns whether the replay buffer is recording.
    fn replay_buffer_active(&self) -> Result<bool>;

    /// Starts the replay buffer.
    fn start_replay_buffer(&self) -> Result<()>;

    /// Asks the application to write the replay buffer to disk. Completion is
    /// reported later through the event subscription.
    fn save_replay_buffer(&self) -> Result<()>;
}

/// Live event subscription. Dropping it unsubscribes.
pub trait Subscription: Send {}

/// Factory for SDK connections.
pub trait CaptureBackend: Send + Sync {
    /// Opens an authenticated request connection.
    fn open_requests(
        &self,
        endpoint: &CaptureEndpoint,
        password: &str,
    ) -> Result<Box<dyn CaptureRequests>>;

    /// Opens an event connection delivering "replay saved" to `handler`.
    fn subscribe_replay_saved(
        &self,
        endpoint: &CaptureEndpoint,
        password: &str,
        handler: ReplaySavedHandler,
    ) -> Result<Box<dyn Subscription>>;
}
