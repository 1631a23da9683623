//! Stream identities and session lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The name of one monitored chat source.
///
/// Identities are trimmed and a leading `@` is dropped, so `"@alice "` and
/// `"alice"` key the same session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamIdentity(String);

impl StreamIdentity {
    /// Creates a normalized identity.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed);
        Self(trimmed.trim().to_string())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if nothing is left after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StreamIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StreamIdentity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StreamIdentity {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for StreamIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Connection state of a stream session.
///
/// `Disconnected -> Connecting -> Connected -> Disconnected`. A dropped
/// connection is never retried; it must be restarted explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl SessionState {
    /// Returns true for the `Connected` state.
    pub fn is_connected(self) -> bool {
        matches!(self, SessionState::Connected)
    }
}
