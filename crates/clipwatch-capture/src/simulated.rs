//! In-process stand-in for the capture application.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{CaptureError, Result};
use crate::sdk::{
    CaptureBackend, CaptureEndpoint, CaptureRequests, ReplaySavedHandler, Subscription,
};

/// Contents written to simulated clips.
const PLACEHOLDER_CLIP: &[u8] = b"clipwatch simulated replay\n";

#[derive(Default)]
struct SimState {
    buffer_active: AtomicBool,
    saves: AtomicUsize,
    next_subscriber: AtomicU64,
    subscribers: Mutex<Vec<(u64, ReplaySavedHandler)>>,
}

impl SimState {
    fn subscribers(&self) -> MutexGuard<'_, Vec<(u64, ReplaySavedHandler)>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Capture backend that writes a placeholder clip on every save.
///
/// Saves complete on a separate thread after `save_delay`, the way a real
/// recorder reports them on its own event connection. Clones share state.
#[derive(Clone)]
pub struct SimulatedCapture {
    clip_dir: PathBuf,
    password: Option<String>,
    save_delay: Duration,
    state: Arc<SimState>,
}

impl SimulatedCapture {
    /// Creates a backend writing clips into `clip_dir`, accepting any password.
    pub fn new(clip_dir: impl Into<PathBuf>) -> Self {
        Self {
            clip_dir: clip_dir.into(),
            password: None,
            save_delay: Duration::from_millis(50),
            state: Arc::new(SimState::default()),
        }
    }

    /// Only accept this password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = delay;
        self
    }

    pub fn with_buffer_active(self, active: bool) -> Self {
        self.state.buffer_active.store(active, Ordering::SeqCst);
        self
    }

    pub fn clip_dir(&self) -> &Path {
        &self.clip_dir
    }

    pub fn buffer_active(&self) -> bool {
        self.state.buffer_active.load(Ordering::SeqCst)
    }

    /// Number of accepted save requests.
    pub fn save_count(&self) -> usize {
        self.state.saves.load(Ordering::SeqCst)
    }

    fn authenticate(&self, password: &str) -> Result<()> {
        match &self.password {
            Some(expected) if expected != password => {
                Err(CaptureError::Connection("authentication failed".to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl CaptureBackend for SimulatedCapture {
    fn open_requests(
        &self,
        endpoint: &CaptureEndpoint,
        password: &str,
    ) -> Result<Box<dyn CaptureRequests>> {
        self.authenticate(password)?;
        debug!(%endpoint, "Simulated capture request connection opened");
        Ok(Box::new(SimRequests {
            capture: self.clone(),
        }))
    }

    fn subscribe_replay_saved(
        &self,
        _endpoint: &CaptureEndpoint,
        password: &str,
        handler: ReplaySavedHandler,
    ) -> Result<Box<dyn Subscription>> {
        self.authenticate(password)?;
        let id = self.state.next_subscriber.fetch_add(1, Ordering::SeqCst);
        self.state.subscribers().push((id, handler));
        Ok(Box::new(SimSubscription {
            id,
            state: Arc::clone(&self.state),
        }))
    }
}

struct SimRequests {
    capture: SimulatedCapture,
}

impl CaptureRequests for SimRequests {
    fn replay_buffer_active(&self) -> Result<bool> {
        Ok(self.capture.buffer_active())
    }

    fn start_replay_buffer(&self) -> Result<()> {
        self.capture.state.buffer_active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn save_replay_buffer(&self) -> Result<()> {
        if !self.capture.buffer_active() {
            return Err(CaptureError::Request("replay buffer is not active".to_string()));
        }
        let n = self.capture.state.saves.fetch_add(1, Ordering::SeqCst) + 1;
        let capture = self.capture.clone();

        thread::Builder::new()
            .name("capture-events".to_string())
            .spawn(move || {
                thread::sleep(capture.save_delay);
                match write_clip(&capture.clip_dir, n) {
                    Ok(path) => {
                        let handlers: Vec<ReplaySavedHandler> = capture
                            .state
                            .subscribers()
                            .iter()
                            .map(|(_, h)| Arc::clone(h))
                            .collect();
                        for handler in handlers {
                            handler(path.clone());
                        }
                    }
                    Err(e) => warn!(error = %e, "Simulated clip write failed"),
                }
            })
            .map(|_| ())
            .map_err(|e| CaptureError::Request(e.to_string()))
    }
}

fn write_clip(dir: &Path, n: usize) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let name = format!("Replay {} {n:04}.mp4", Utc::now().format("%Y-%m-%d %H-%M-%S"));
    let path = dir.join(name);
    fs::write(&path, PLACEHOLDER_CLIP)?;
    Ok(path)
}

struct SimSubscription {
    id: u64,
    state: Arc<SimState>,
}

impl Subscription for SimSubscription {}

impl Drop for SimSubscription {
    fn drop(&mut self) {
        self.state.subscribers().retain(|(id, _)| *id != self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_password_check() {
        let dir = tempdir().unwrap();
        let sim = SimulatedCapture::new(dir.path()).with_password("pw");
        let endpoint = CaptureEndpoint::default();

        assert!(sim.open_requests(&endpoint, "pw").is_ok());
        assert!(matches!(
            sim.open_requests(&endpoint, "nope"),
            Err(CaptureError::Connection(_))
        ));
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let dir = tempdir().unwrap();
        let sim = SimulatedCapture::new(dir.path());
        let sub = sim
            .subscribe_replay_saved(&CaptureEndpoint::default(), "", Arc::new(|_: PathBuf| {}))
            .unwrap();
        assert_eq!(sim.state.subscribers().len(), 1);

        drop(sub);
        assert!(sim.state.subscribers().is_empty());
    }

    #[test]
    fn test_write_clip_names_are_distinct() {
        let dir = tempdir().unwrap();
        let first = write_clip(dir.path(), 1).unwrap();
        let second = write_clip(dir.path(), 2).unwrap();
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
    }
}
