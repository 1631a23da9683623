//! Core data models for Clipwatch.
//!
//! This crate provides the plain data types shared by every Clipwatch crate:
//! stream identities, keyword sets, chat events, trigger records, journal
//! entries and the capture connection state.

pub mod capture;
pub mod chat;
pub mod ids;
pub mod journal;
pub mod keywords;
pub mod stream;
pub mod trigger;

// Re-export main types
pub use capture::CaptureConnectionState;
pub use chat::ChatEvent;
pub use ids::{NotificationId, TriggerId};
pub use journal::{LogEntry, LogTag, NotificationEvent};
pub use keywords::KeywordSet;
pub use stream::{SessionState, StreamIdentity};
pub use trigger::TriggerRecord;
