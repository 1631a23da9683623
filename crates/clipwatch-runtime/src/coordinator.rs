//! The coordinator: single authority over sessions, triggers and renames.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;

use chrono::{DateTime, Utc};
use clipwatch_capture::{CaptureBackend, CaptureClient, PreRollStatus, ReplaySavedHandler};
use clipwatch_core::{CoreError, Settings};
use clipwatch_events::{LogFilter, LogJournal, NotificationQueue};
use clipwatch_models::{
    CaptureConnectionState, LogEntry, NotificationEvent, SessionState, StreamIdentity,
    TriggerRecord,
};
use tracing::{debug, info};

use crate::config::CoordinatorConfig;
use crate::correlation::TriggerSlot;
use crate::error::{Result, RuntimeError};
use crate::event_loop::{EventLoop, LoopCommand};
use crate::feed::ChatFeedConnector;
use crate::rename::{rename_with_retry, target_path};

/// Answer to a capture connection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectAck {
    /// True if a connection attempt was started. Not a confirmation.
    pub accepted: bool,
    pub message: String,
}

/// Everything the UI polls for.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub logs: Vec<LogEntry>,
    /// Configured and running streams, true when connected.
    pub active_streams: BTreeMap<StreamIdentity, bool>,
    pub capture: CaptureConnectionState,
    /// Notifications drained by this call.
    pub notifications: Vec<NotificationEvent>,
    pub notification_duration: i64,
}

/// State touched from both the loop thread and the capture callback thread.
pub(crate) struct Shared {
    pub config: CoordinatorConfig,
    pub journal: LogJournal,
    pub notifications: NotificationQueue,
    pub triggers: TriggerSlot,
    pub capture: CaptureClient,
    settings: RwLock<Settings>,
}

impl Shared {
    pub fn log(&self, entry: LogEntry) {
        self.journal.append(entry);
    }

    pub fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_settings(&self, settings: Settings) {
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    pub fn notifications_enabled(&self) -> bool {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .notifications_enabled
    }

    /// Asks the capture application to save, if it is connected.
    pub fn request_save(&self, stream: &StreamIdentity) {
        if !self.capture.is_connected() {
            self.log(
                LogEntry::error("Trigger matched, but capture not connected!")
                    .for_stream(stream.clone()),
            );
            return;
        }
        let entry = match self.capture.trigger_save() {
            Ok(()) => LogEntry::success("Replay save requested!"),
            Err(e) => LogEntry::error(format!("Save failed: {e}")),
        };
        self.log(entry.for_stream(stream.clone()));
    }

    fn connect_capture(self: &Arc<Self>, password: &str) -> Result<()> {
        self.log(LogEntry::info("Connecting to capture..."));

        // Weak: the client keeps the handler alive and `Shared` owns the client.
        let weak = Arc::downgrade(self);
        let on_saved: ReplaySavedHandler = Arc::new(move |path: PathBuf| {
            if let Some(shared) = weak.upgrade() {
                shared.on_replay_saved_at(&path, Utc::now());
            }
        });

        if let Err(e) = self.capture.connect(password, on_saved) {
            self.log(LogEntry::error(e.to_string()));
            return Err(e.into());
        }
        self.log(LogEntry::success("Connected to capture!"));

        let entry = match self.capture.ensure_pre_roll_active() {
            Ok(PreRollStatus::Started) => LogEntry::success("Replay buffer started."),
            Ok(PreRollStatus::AlreadyRunning) => {
                LogEntry::success("Replay buffer is already running.")
            }
            Err(e) => LogEntry::error(format!("Replay buffer check failed: {e}")),
        };
        self.log(entry);
        Ok(())
    }

    fn on_replay_saved_at(&self, path: &Path, at: DateTime<Utc>) {
        let Some(record) = self.triggers.take_for_artifact() else {
            self.log(LogEntry::success(format!("Replay saved: {}", path.display())));
            return;
        };

        let target = target_path(path, &record, at);
        debug!(
            from = %path.display(),
            to = %target.display(),
            trigger = %record.id,
            "Renaming clip"
        );

        let entry = match rename_with_retry(
            self.config.clip_mover.as_ref(),
            path,
            &target,
            &self.config.rename,
        ) {
            Ok(()) => {
                let name = target
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                LogEntry::success(format!("Replay saved as {name}"))
            }
            Err(e) => LogEntry::error(format!("Rename failed, clip kept: {e}")),
        };
        self.log(entry.for_stream(record.stream));
    }
}

/// Watches chat streams for keywords and turns matches into named clips.
///
/// Construct one per process and share it by reference (or `Arc`) with the
/// transport layer. The background loop starts on first use and runs for the
/// rest of the process.
pub struct Coordinator {
    shared: Arc<Shared>,
    event_loop: EventLoop,
}

impl Coordinator {
    pub fn new(
        config: CoordinatorConfig,
        feeds: Arc<dyn ChatFeedConnector>,
        capture: Arc<dyn CaptureBackend>,
    ) -> Self {
        let shared = Arc::new(Shared {
            journal: LogJournal::new(config.log_capacity),
            notifications: NotificationQueue::new(),
            triggers: TriggerSlot::new(config.correlation),
            capture: CaptureClient::new(capture, config.capture_endpoint.clone()),
            settings: RwLock::new(Settings::default()),
            config,
        });
        let event_loop = EventLoop::new(Arc::clone(&shared), feeds);
        Self { shared, event_loop }
    }

    /// Appends an entry to the operator log.
    pub fn log(&self, entry: LogEntry) {
        self.shared.log(entry);
    }

    /// Current operator settings.
    pub fn settings(&self) -> Settings {
        self.shared.settings()
    }

    /// Replaces the operator settings. Running sessions pick up the new
    /// keywords; notification settings apply to the next trigger.
    pub fn apply_settings(&self, settings: Settings) {
        let keywords = settings.keyword_set();
        self.shared.replace_settings(settings);
        self.event_loop
            .send_if_running(LoopCommand::SetKeywords(keywords));
    }

    fn reject(&self, error: CoreError) -> RuntimeError {
        self.shared.log(LogEntry::error(error.to_string()));
        RuntimeError::Configuration(error)
    }

    /// Schedules monitoring of `identity`.
    ///
    /// Returns once the request is queued; poll [`is_active`](Self::is_active)
    /// to observe the connection. Missing identity or keywords are rejected
    /// here and change nothing.
    pub fn start(&self, identity: &str) -> Result<()> {
        let identity = StreamIdentity::new(identity);
        if identity.is_empty() {
            return Err(self.reject(CoreError::MissingIdentity));
        }
        let keywords = self
            .shared
            .settings()
            .monitor_keywords()
            .map_err(|e| self.reject(e))?;
        self.event_loop
            .send(LoopCommand::Start { identity, keywords })
    }

    /// Starts every identity in the saved settings. Nothing starts unless
    /// the whole configuration is valid.
    pub fn start_configured(&self) -> Result<Vec<StreamIdentity>> {
        let settings = self.shared.settings();
        settings.validate().map_err(|e| self.reject(e))?;
        let identities = settings.identities();
        for identity in &identities {
            self.start(identity.as_str())?;
        }
        Ok(identities)
    }

    /// Schedules removal of the session for `identity`. Does not wait for
    /// the chat connection to close.
    pub fn stop(&self, identity: &str) -> Result<()> {
        let identity = StreamIdentity::new(identity);
        if identity.is_empty() {
            return Err(self.reject(CoreError::MissingIdentity));
        }
        self.event_loop.send(LoopCommand::Stop { identity })
    }

    /// True if a session for `identity` exists and its feed is connected.
    pub async fn is_active(&self, identity: &str) -> Result<bool> {
        let identity = StreamIdentity::new(identity);
        self.event_loop
            .query(|reply| LoopCommand::IsActive { identity, reply })
            .await
    }

    /// Sessions currently held by the loop and their states.
    pub async fn sessions(&self) -> Result<BTreeMap<StreamIdentity, SessionState>> {
        self.event_loop
            .query(|reply| LoopCommand::Sessions { reply })
            .await
    }

    /// Configured identities plus running sessions, mapped to whether each
    /// one is connected.
    pub async fn active_streams(&self) -> Result<BTreeMap<StreamIdentity, bool>> {
        let mut streams: BTreeMap<StreamIdentity, bool> = self
            .sessions()
            .await?
            .into_iter()
            .map(|(id, state)| (id, state.is_connected()))
            .collect();
        for identity in self.shared.settings().identities() {
            streams.entry(identity).or_insert(false);
        }
        Ok(streams)
    }

    /// Starts connecting to the capture application in the background.
    ///
    /// An empty `password` falls back to the saved one. Acceptance means the
    /// attempt started; progress shows up in the log.
    pub fn connect_capture(&self, password: Option<&str>) -> ConnectAck {
        let password = match password.filter(|p| !p.is_empty()) {
            Some(p) => p.to_string(),
            None => self.shared.settings().obs_password,
        };
        if password.is_empty() {
            let error = self.reject(CoreError::MissingPassword);
            return ConnectAck {
                accepted: false,
                message: error.to_string(),
            };
        }

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("capture-connect".to_string())
            .spawn(move || {
                let _ = shared.connect_capture(&password);
            });

        match spawned {
            Ok(_) => ConnectAck {
                accepted: true,
                message: "Connecting to capture...".to_string(),
            },
            Err(e) => {
                let message = format!("Could not start capture connection: {e}");
                self.shared.log(LogEntry::error(message.clone()));
                ConnectAck {
                    accepted: false,
                    message,
                }
            }
        }
    }

    /// Connects to the capture application on the calling thread.
    pub fn connect_capture_blocking(&self, password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(self.reject(CoreError::MissingPassword));
        }
        self.shared.connect_capture(password)
    }

    pub fn capture_state(&self) -> CaptureConnectionState {
        self.shared.capture.state()
    }

    /// Handles a finished save. Blocks for the rename retries, so call it
    /// from the capture callback thread, never from the event loop.
    pub fn on_replay_saved(&self, path: &Path) {
        self.shared.on_replay_saved_at(path, Utc::now());
    }

    /// [`on_replay_saved`](Self::on_replay_saved) with an explicit clock.
    pub fn on_replay_saved_at(&self, path: &Path, at: DateTime<Utc>) {
        self.shared.on_replay_saved_at(path, at);
    }

    /// Most recent trigger awaiting a clip.
    pub fn latest_trigger(&self) -> Option<TriggerRecord> {
        self.shared.triggers.latest()
    }

    pub fn drain_notifications(&self) -> Vec<NotificationEvent> {
        self.shared.notifications.drain()
    }

    pub fn snapshot_logs(&self, filter: &LogFilter) -> Vec<LogEntry> {
        self.shared.journal.snapshot(filter)
    }

    pub fn clear_logs(&self) {
        self.shared.journal.clear();
        info!("Operator log cleared");
    }

    /// Logs (optionally for one stream), stream states, capture state and
    /// the drained notification queue.
    pub async fn status(&self, stream: Option<StreamIdentity>) -> Result<StatusReport> {
        let filter = match stream {
            Some(stream) => LogFilter::new().with_stream(stream),
            None => LogFilter::new(),
        };
        let active_streams = self.active_streams().await?;
        Ok(StatusReport {
            logs: self.snapshot_logs(&filter),
            active_streams,
            capture: self.capture_state(),
            notifications: self.drain_notifications(),
            notification_duration: self.shared.settings().notification_duration,
        })
    }
}
