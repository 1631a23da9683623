//! Operator-facing event storage for Clipwatch.
//!
//! Both containers here are written from two threads: the coordinator's
//! event loop and the capture callback thread. They are cheap to clone and
//! every clone shares the same storage.
//!
//! - [`LogJournal`]: fixed-capacity ring buffer of [`LogEntry`] values
//! - [`NotificationQueue`]: bounded FIFO of trigger notifications, drained by the UI
//! - [`LogFilter`]: snapshot criteria for the journal
//!
//! [`LogEntry`]: clipwatch_models::LogEntry

pub mod filter;
pub mod journal;
pub mod notifications;

pub use filter::LogFilter;
pub use journal::{LogJournal, DEFAULT_LOG_CAPACITY};
pub use notifications::{NotificationQueue, DEFAULT_NOTIFICATION_CAPACITY};
