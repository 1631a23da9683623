//! Trigger records awaiting artifact correlation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::ChatEvent;
use crate::ids::TriggerId;
use crate::stream::StreamIdentity;

/// A chat message that matched a keyword and caused a clip save.
///
/// Read when a save-completed callback arrives to decide the clip name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRecord {
    pub id: TriggerId,
    /// Stream the triggering message arrived on.
    pub stream: StreamIdentity,
    /// Chatter the clip is named after (display name, or ID if blank).
    pub chatter: String,
    /// The keyword that matched.
    pub keyword: String,
    /// Full text of the triggering message.
    pub matched_text: String,
    pub fired_at: DateTime<Utc>,
}

impl TriggerRecord {
    /// Creates a record for `event` fired now.
    pub fn from_event(event: &ChatEvent, keyword: impl Into<String>) -> Self {
        Self {
            id: TriggerId::new(),
            stream: event.stream.clone(),
            chatter: event.chatter_label().to_string(),
            keyword: keyword.into(),
            matched_text: event.text.clone(),
            fired_at: Utc::now(),
        }
    }
}
