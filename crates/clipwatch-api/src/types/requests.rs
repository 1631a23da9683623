//! Request DTOs for the API.

use serde::Deserialize;

/// Capture connection request. Without a password the saved one is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectCaptureRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// What to do with a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamAction {
    Start,
    Stop,
}

/// Start/stop toggle request.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamActionRequest {
    pub identity: String,
    pub action: StreamAction,
}

/// A chat message to inject into a loopback feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessageRequest {
    /// Chatter ID.
    pub chatter: String,
    /// Display name; the chatter ID is used when absent.
    #[serde(default)]
    pub display_name: Option<String>,
    pub text: String,
}

/// Status query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    /// Only include log entries for this stream (plus global ones).
    pub stream: Option<String>,
}
