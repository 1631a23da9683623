//! Capture application connection state.

use serde::{Deserialize, Serialize};

/// What the coordinator can observe about the capture application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaptureConnectionState {
    pub connected: bool,
    /// Whether the replay buffer is known to be recording.
    pub pre_roll_active: bool,
}

impl CaptureConnectionState {
    pub fn disconnected() -> Self {
        Self::default()
    }
}
