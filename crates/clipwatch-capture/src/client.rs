//! Synchronous facade over a capture backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use clipwatch_models::CaptureConnectionState;
use tracing::{debug, info, warn};

use crate::error::{CaptureError, Result};
use crate::sdk::{
    CaptureBackend, CaptureEndpoint, CaptureRequests, ReplaySavedHandler, Subscription,
};

/// Outcome of [`CaptureClient::ensure_pre_roll_active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreRollStatus {
    /// The buffer was already recording.
    AlreadyRunning,
    /// The buffer was stopped and has been started.
    Started,
}

struct Connection {
    requests: Box<dyn CaptureRequests>,
    _events: Box<dyn Subscription>,
}

/// Client for the capture application.
///
/// Holds at most one connection. It owns no business state beyond the
/// connection handle and the last known replay buffer status. Every call
/// blocks until the backend answers, so callers on an async runtime should
/// run `connect` off the runtime threads.
pub struct CaptureClient {
    backend: Arc<dyn CaptureBackend>,
    endpoint: CaptureEndpoint,
    connection: Mutex<Option<Connection>>,
    pre_roll_active: AtomicBool,
}

impl std::fmt::Debug for CaptureClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureClient")
            .field("endpoint", &self.endpoint)
            .field("state", &self.state())
            .finish()
    }
}

impl CaptureClient {
    pub fn new(backend: Arc<dyn CaptureBackend>, endpoint: CaptureEndpoint) -> Self {
        Self {
            backend,
            endpoint,
            connection: Mutex::new(None),
            pre_roll_active: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.connection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens the request connection, then the event subscription that
    /// delivers `on_saved`. Any previous connection is dropped first.
    ///
    /// Failures are returned, never retried.
    pub fn connect(&self, password: &str, on_saved: ReplaySavedHandler) -> Result<()> {
        self.disconnect();
        info!(endpoint = %self.endpoint, "Connecting to capture application");

        let requests = self.backend.open_requests(&self.endpoint, password)?;
        let events = self
            .backend
            .subscribe_replay_saved(&self.endpoint, password, on_saved)?;

        *self.lock() = Some(Connection {
            requests,
            _events: events,
        });
        info!(endpoint = %self.endpoint, "Connected to capture application");
        Ok(())
    }

    /// Drops the current connection, if any.
    pub fn disconnect(&self) {
        if self.lock().take().is_some() {
            debug!(endpoint = %self.endpoint, "Capture connection closed");
        }
        self.pre_roll_active.store(false, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.lock().is_some()
    }

    pub fn state(&self) -> CaptureConnectionState {
        CaptureConnectionState {
            connected: self.is_connected(),
            pre_roll_active: self.pre_roll_active.load(Ordering::SeqCst),
        }
    }

    /// Starts the replay buffer unless it is already recording.
    pub fn ensure_pre_roll_active(&self) -> Result<PreRollStatus> {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or(CaptureError::NotConnected)?;

        if conn.requests.replay_buffer_active()? {
            self.pre_roll_active.store(true, Ordering::SeqCst);
            debug!("Replay buffer already running");
            return Ok(PreRollStatus::AlreadyRunning);
        }

        conn.requests.start_replay_buffer()?;
        self.pre_roll_active.store(true, Ordering::SeqCst);
        info!("Replay buffer started");
        Ok(PreRollStatus::Started)
    }

    /// Requests a save. Completion arrives through the `on_saved` callback
    /// given to [`connect`](Self::connect), not through this return value.
    pub fn trigger_save(&self) -> Result<()> {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or(CaptureError::NotConnected)?;
        conn.requests.save_replay_buffer().map_err(|e| {
            warn!(error = %e, "Replay save request failed");
            e
        })
    }
}
