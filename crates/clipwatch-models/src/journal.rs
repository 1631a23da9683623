//! Operator-facing log entries and notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::NotificationId;
use crate::stream::StreamIdentity;
use crate::trigger::TriggerRecord;

/// Severity tag of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogTag {
    Info,
    Success,
    Error,
    Trigger,
}

impl LogTag {
    pub fn as_str(self) -> &'static str {
        match self {
            LogTag::Info => "info",
            LogTag::Success => "success",
            LogTag::Error => "error",
            LogTag::Trigger => "trigger",
        }
    }
}

impl fmt::Display for LogTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the operator log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub tag: LogTag,
    pub timestamp: DateTime<Utc>,
    /// Stream the entry relates to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<StreamIdentity>,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, tag: LogTag) -> Self {
        Self {
            message: message.into(),
            tag,
            timestamp: Utc::now(),
            stream: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, LogTag::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, LogTag::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, LogTag::Error)
    }

    pub fn trigger(message: impl Into<String>) -> Self {
        Self::new(message, LogTag::Trigger)
    }

    /// Attaches the stream this entry relates to.
    pub fn for_stream(mut self, stream: impl Into<StreamIdentity>) -> Self {
        self.stream = Some(stream.into());
        self
    }

    /// Returns true if the entry belongs to `stream`.
    pub fn is_for(&self, stream: &StreamIdentity) -> bool {
        self.stream.as_ref() == Some(stream)
    }
}

/// A trigger announcement queued for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub id: NotificationId,
    pub stream: StreamIdentity,
    pub chatter: String,
    pub message: String,
    pub keyword: String,
    pub fired_at: DateTime<Utc>,
}

impl From<&TriggerRecord> for NotificationEvent {
    fn from(record: &TriggerRecord) -> Self {
        Self {
            id: NotificationId::new(),
            stream: record.stream.clone(),
            chatter: record.chatter.clone(),
            message: record.matched_text.clone(),
            keyword: record.keyword.clone(),
            fired_at: record.fired_at,
        }
    }
}
