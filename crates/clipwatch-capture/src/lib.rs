//! Capture application adapter for Clipwatch.
//!
//! The capture application (a recorder with a replay buffer) is reached
//! through two SDK connections: a request connection for status and save
//! commands, and an event subscription that reports finished saves. This
//! crate defines those boundaries as traits ([`CaptureBackend`],
//! [`CaptureRequests`]), wraps them in the synchronous [`CaptureClient`]
//! facade, and ships [`SimulatedCapture`] for dry runs and tests.

pub mod client;
pub mod error;
pub mod sdk;
pub mod simulated;

pub use client::{CaptureClient, PreRollStatus};
pub use error::{CaptureError, Result};
pub use sdk::{CaptureBackend, CaptureEndpoint, CaptureRequests, ReplaySavedHandler, Subscription};
pub use simulated::SimulatedCapture;
