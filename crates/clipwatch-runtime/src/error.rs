//! Error types for the runtime crate.

use clipwatch_capture::CaptureError;
use clipwatch_core::CoreError;
use thiserror::Error;

/// Errors returned by coordinator operations.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Operator configuration is incomplete. Nothing was changed.
    #[error("{0}")]
    Configuration(#[from] CoreError),

    /// The background event loop could not be started or has exited.
    #[error("event loop unavailable")]
    LoopUnavailable,

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Errors reported by a chat feed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Handshake with the chat provider failed.
    #[error("{0}")]
    Connect(String),
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
