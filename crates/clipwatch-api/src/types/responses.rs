//! Response DTOs for the API.

use std::collections::BTreeMap;

use clipwatch_models::{LogEntry, NotificationEvent};
use clipwatch_persistence::ReplayFile;
use clipwatch_runtime::{ConnectAck, StatusReport};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Generic success response.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// Answer to a start/stop request. The change happens in the background.
#[derive(Debug, Clone, Serialize)]
pub struct StreamActionResponse {
    pub identity: String,
    pub action: String,
    pub message: String,
}

/// Capture connection answer. `accepted` means the attempt was started.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectCaptureResponse {
    pub accepted: bool,
    pub message: String,
}

impl From<ConnectAck> for ConnectCaptureResponse {
    fn from(ack: ConnectAck) -> Self {
        Self {
            accepted: ack.accepted,
            message: ack.message,
        }
    }
}

/// Injected chat message result.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageResponse {
    pub delivered: bool,
}

/// Status poll response.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub logs: Vec<LogEntry>,
    /// Stream identity to connected flag.
    pub active_streams: BTreeMap<String, bool>,
    pub capture_connected: bool,
    pub pre_roll_active: bool,
    /// Notifications drained by this poll.
    pub notifications: Vec<NotificationEvent>,
    /// Seconds the UI keeps a notification visible.
    pub notification_duration: i64,
}

impl From<StatusReport> for StatusResponse {
    fn from(report: StatusReport) -> Self {
        Self {
            logs: report.logs,
            active_streams: report
                .active_streams
                .into_iter()
                .map(|(identity, active)| (identity.as_str().to_string(), active))
                .collect(),
            capture_connected: report.capture.connected,
            pre_roll_active: report.capture.pre_roll_active,
            notifications: report.notifications,
            notification_duration: report.notification_duration,
        }
    }
}

/// Replay listing response, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayListResponse {
    pub replays: Vec<ReplayFile>,
    pub total: usize,
}
