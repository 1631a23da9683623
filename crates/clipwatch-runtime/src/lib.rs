//! Multi-stream trigger-and-capture coordinator for Clipwatch.
//!
//! - [`Coordinator`]: owns the background event loop, the active sessions,
//!   the pending trigger, the operator log and the notification queue
//! - [`ChatFeed`] / [`ChatFeedConnector`]: capability interface for chat
//!   providers, with [`LoopbackHub`] as the in-process implementation
//! - [`CoordinatorConfig`]: capture endpoint, rename retries, log capacity,
//!   transcripts and correlation mode
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use clipwatch_capture::SimulatedCapture;
//! use clipwatch_core::Settings;
//! use clipwatch_runtime::{Coordinator, CoordinatorConfig, LoopbackHub};
//!
//! # async fn demo() -> clipwatch_runtime::Result<()> {
//! let hub = LoopbackHub::new();
//! let coordinator = Coordinator::new(
//!     CoordinatorConfig::default(),
//!     Arc::new(hub.clone()),
//!     Arc::new(SimulatedCapture::new("/tmp/clips")),
//! );
//! coordinator.apply_settings(Settings::default().with_usernames("alice"));
//! coordinator.connect_capture_blocking("secret")?;
//! coordinator.start("alice")?;
//!
//! hub.say("alice", "bob", "look at that lock");
//! let status = coordinator.status(None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Threads
//!
//! Chat handling runs on the coordinator's loop thread. Save-completed
//! callbacks run on the capture backend's thread and may block there for
//! the rename retries. The log, the notification queue and the pending
//! trigger are the only state both threads touch.

pub mod config;
pub mod coordinator;
pub mod correlation;
pub mod error;
mod event_loop;
pub mod feed;
pub mod loopback;
pub mod rename;
mod session;

pub use config::{CoordinatorConfig, CorrelationMode, RenamePolicy};
pub use coordinator::{ConnectAck, Coordinator, StatusReport};
pub use correlation::TriggerSlot;
pub use error::{Result, RuntimeError, SessionError};
pub use feed::{ChatFeed, ChatFeedConnector, ConnectedHandler, MessageHandler};
pub use loopback::{LoopbackFeed, LoopbackHub};
pub use rename::{rename_with_retry, target_path, ClipMover, FsMover, RenameError};
