//! Chat events delivered by stream sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stream::StreamIdentity;

/// A single chat message received on a monitored stream.
///
/// Transient: produced by a session, consumed once by the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Stream the message arrived on.
    pub stream: StreamIdentity,
    /// Stable identifier of the chatter.
    pub chatter_id: String,
    /// Display name of the chatter, as shown in chat.
    pub chatter_name: String,
    /// Message text exactly as received.
    pub text: String,
    /// When the message was received.
    pub received_at: DateTime<Utc>,
}

impl ChatEvent {
    /// Creates an event received now. The display name defaults to the chatter ID.
    pub fn new(
        stream: impl Into<StreamIdentity>,
        chatter_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let chatter_id = chatter_id.into();
        Self {
            stream: stream.into(),
            chatter_name: chatter_id.clone(),
            chatter_id,
            text: text.into(),
            received_at: Utc::now(),
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.chatter_name = name.into();
        self
    }

    /// Sets the receive time.
    pub fn with_received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = at;
        self
    }

    /// Name used when naming clips and writing logs: the display name,
    /// falling back to the chatter ID when the display name is blank.
    pub fn chatter_label(&self) -> &str {
        if self.chatter_name.trim().is_empty() {
            &self.chatter_id
        } else {
            &self.chatter_name
        }
    }
}
