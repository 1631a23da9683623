//! Error types for capture operations.

use thiserror::Error;

/// Errors reported by the capture adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Handshake or authentication with the capture application failed.
    #[error("Capture connection failed: {0}")]
    Connection(String),

    #[error("Capture not connected")]
    NotConnected,

    /// A status, start or save request failed. The connection stays usable.
    #[error("Capture request failed: {0}")]
    Request(String),
}

/// Result type for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;
