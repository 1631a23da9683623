//! Error types for core configuration checks.

use thiserror::Error;

/// Errors raised when operator configuration cannot be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Please enter a stream username")]
    MissingIdentity,

    #[error("Please enter at least one keyword")]
    EmptyKeywords,

    #[error("Please enter the capture password")]
    MissingPassword,

    #[error("Invalid notification duration: {0} seconds")]
    InvalidNotificationDuration(i64),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
