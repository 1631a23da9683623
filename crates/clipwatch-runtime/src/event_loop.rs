//! The coordinator's background event loop.
//!
//! One dedicated thread runs a single-threaded tokio runtime. Session
//! start/stop, chat handling and session bookkeeping all happen there, in
//! the order their commands arrive. The session map and the keyword set live
//! only on that thread and need no locking.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};
use std::thread;

use chrono::Utc;
use clipwatch_core::match_keyword;
use clipwatch_models::{
    ChatEvent, KeywordSet, LogEntry, NotificationEvent, SessionState, StreamIdentity, TriggerRecord,
};
use clipwatch_persistence::Transcript;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::coordinator::Shared;
use crate::error::{Result, RuntimeError, SessionError};
use crate::feed::ChatFeedConnector;
use crate::session::StreamSession;

/// Work scheduled onto the loop.
pub(crate) enum LoopCommand {
    Start {
        identity: StreamIdentity,
        keywords: KeywordSet,
    },
    Stop {
        identity: StreamIdentity,
    },
    SetKeywords(KeywordSet),
    Chat {
        event: ChatEvent,
        generation: u64,
    },
    Connected {
        identity: StreamIdentity,
        generation: u64,
    },
    Ended {
        identity: StreamIdentity,
        generation: u64,
        result: std::result::Result<(), SessionError>,
    },
    IsActive {
        identity: StreamIdentity,
        reply: oneshot::Sender<bool>,
    },
    Sessions {
        reply: oneshot::Sender<BTreeMap<StreamIdentity, SessionState>>,
    },
}

/// Handle to the loop thread, started on first use.
pub(crate) struct EventLoop {
    tx: OnceLock<mpsc::UnboundedSender<LoopCommand>>,
    shared: Arc<Shared>,
    feeds: Arc<dyn ChatFeedConnector>,
}

impl EventLoop {
    pub fn new(shared: Arc<Shared>, feeds: Arc<dyn ChatFeedConnector>) -> Self {
        Self {
            tx: OnceLock::new(),
            shared,
            feeds,
        }
    }

    fn sender(&self) -> &mpsc::UnboundedSender<LoopCommand> {
        self.tx
            .get_or_init(|| spawn_loop(Arc::clone(&self.shared), Arc::clone(&self.feeds)))
    }

    /// Schedules `command` and returns without waiting for it to run.
    pub fn send(&self, command: LoopCommand) -> Result<()> {
        self.sender()
            .send(command)
            .map_err(|_| RuntimeError::LoopUnavailable)
    }

    /// Schedules `command` only if the loop is already running.
    pub fn send_if_running(&self, command: LoopCommand) {
        if let Some(tx) = self.tx.get() {
            let _ = tx.send(command);
        }
    }

    /// Schedules a query and waits for its answer.
    pub async fn query<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> LoopCommand,
    ) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply))?;
        rx.await.map_err(|_| RuntimeError::LoopUnavailable)
    }
}

fn spawn_loop(
    shared: Arc<Shared>,
    feeds: Arc<dyn ChatFeedConnector>,
) -> mpsc::UnboundedSender<LoopCommand> {
    let (tx, rx) = mpsc::unbounded_channel();
    let loop_tx = tx.clone();

    let spawned = thread::Builder::new()
        .name("clipwatch-loop".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!(error = %e, "Failed to build event loop runtime");
                    return;
                }
            };
            let state = LoopState::new(shared, feeds, loop_tx);
            runtime.block_on(state.run(rx));
        });

    match spawned {
        Ok(_) => debug!("Event loop thread started"),
        Err(e) => error!(error = %e, "Failed to spawn event loop thread"),
    }
    tx
}

struct LoopState {
    shared: Arc<Shared>,
    feeds: Arc<dyn ChatFeedConnector>,
    loop_tx: mpsc::UnboundedSender<LoopCommand>,
    sessions: HashMap<StreamIdentity, StreamSession>,
    keywords: KeywordSet,
    next_generation: u64,
}

impl LoopState {
    fn new(
        shared: Arc<Shared>,
        feeds: Arc<dyn ChatFeedConnector>,
        loop_tx: mpsc::UnboundedSender<LoopCommand>,
    ) -> Self {
        let keywords = shared.settings().keyword_set();
        Self {
            shared,
            feeds,
            loop_tx,
            sessions: HashMap::new(),
            keywords,
            next_generation: 0,
        }
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<LoopCommand>) {
        while let Some(command) = rx.recv().await {
            self.handle(command);
        }
        debug!("Event loop channel closed");
    }

    fn handle(&mut self, command: LoopCommand) {
        match command {
            LoopCommand::Start { identity, keywords } => self.start_session(identity, keywords),
            LoopCommand::Stop { identity } => self.stop_session(&identity),
            LoopCommand::SetKeywords(keywords) => {
                debug!(keywords = %keywords, "Keywords updated");
                self.keywords = keywords;
            }
            LoopCommand::Chat { event, generation } => self.on_chat_message(event, generation),
            LoopCommand::Connected {
                identity,
                generation,
            } => self.on_connected(&identity, generation),
            LoopCommand::Ended {
                identity,
                generation,
                result,
            } => self.on_session_ended(&identity, generation, result),
            LoopCommand::IsActive { identity, reply } => {
                let active = self
                    .sessions
                    .get(&identity)
                    .is_some_and(StreamSession::is_connected);
                let _ = reply.send(active);
            }
            LoopCommand::Sessions { reply } => {
                let sessions = self
                    .sessions
                    .iter()
                    .map(|(id, s)| (id.clone(), s.state()))
                    .collect();
                let _ = reply.send(sessions);
            }
        }
    }

    fn is_current(&self, identity: &StreamIdentity, generation: u64) -> bool {
        self.sessions
            .get(identity)
            .is_some_and(|s| s.generation == generation)
    }

    fn start_session(&mut self, identity: StreamIdentity, keywords: KeywordSet) {
        self.keywords = keywords;

        if let Some(existing) = self.sessions.get(&identity) {
            if existing.is_connected() {
                self.shared.log(
                    LogEntry::info(format!("Monitor already running for @{identity}"))
                        .for_stream(identity),
                );
                return;
            }
            debug!(stream = %identity, "Replacing session that is not connected");
            existing.shut_down();
            self.sessions.remove(&identity);
        }

        self.shared.log(
            LogEntry::info(format!("Starting monitor for: @{identity}"))
                .for_stream(identity.clone()),
        );
        self.shared.log(
            LogEntry::info(format!("Keywords: {}", self.keywords)).for_stream(identity.clone()),
        );

        let transcript = self.open_transcript(&identity);
        self.next_generation += 1;
        let feed = self.feeds.create(&identity);
        let session = StreamSession::spawn(
            identity.clone(),
            self.next_generation,
            feed,
            transcript,
            self.loop_tx.clone(),
        );
        info!(stream = %identity, generation = session.generation, "Session started");
        self.sessions.insert(identity, session);
    }

    fn open_transcript(&self, identity: &StreamIdentity) -> Option<Transcript> {
        let dir = self.shared.config.transcript_dir.as_ref()?;
        match Transcript::open(dir, identity, Utc::now()) {
            Ok(transcript) => Some(transcript),
            Err(e) => {
                warn!(stream = %identity, error = %e, "Transcripts disabled for session");
                None
            }
        }
    }

    fn stop_session(&mut self, identity: &StreamIdentity) {
        let Some(session) = self.sessions.remove(identity) else {
            self.shared.log(
                LogEntry::info(format!("Monitor not running for @{identity}"))
                    .for_stream(identity.clone()),
            );
            return;
        };

        self.shared.log(
            LogEntry::info(format!("Stopping monitor for @{identity}"))
                .for_stream(identity.clone()),
        );
        session.shut_down();
        self.shared.log(
            LogEntry::info(format!("Monitoring stopped for @{identity}"))
                .for_stream(identity.clone()),
        );
    }

    fn on_connected(&self, identity: &StreamIdentity, generation: u64) {
        if !self.is_current(identity, generation) {
            return;
        }
        self.shared.log(
            LogEntry::success(format!("LIVE: Connected to {identity}!"))
                .for_stream(identity.clone()),
        );
    }

    fn on_session_ended(
        &mut self,
        identity: &StreamIdentity,
        generation: u64,
        result: std::result::Result<(), SessionError>,
    ) {
        if !self.is_current(identity, generation) {
            debug!(stream = %identity, generation, "Ignoring end of replaced session");
            return;
        }
        self.sessions.remove(identity);

        let entry = match result {
            Ok(()) => LogEntry::info(format!("Chat connection closed for @{identity}")),
            Err(e) => LogEntry::error(format!("Chat connection error: {e}")),
        };
        self.shared.log(entry.for_stream(identity.clone()));
    }

    fn on_chat_message(&self, event: ChatEvent, generation: u64) {
        let Some(session) = self
            .sessions
            .get(&event.stream)
            .filter(|s| s.generation == generation)
        else {
            return;
        };

        if let Some(transcript) = &session.transcript {
            if let Err(e) = transcript.record_chat(&event) {
                warn!(stream = %event.stream, error = %e, "Failed to write chat transcript");
            }
        }

        let Some(keyword) = match_keyword(&event.text, self.keywords.iter()) else {
            return;
        };

        self.shared.log(
            LogEntry::trigger(format!(
                "TRIGGER: {} says '{}'",
                event.chatter_label(),
                event.text
            ))
            .for_stream(event.stream.clone()),
        );

        let record = TriggerRecord::from_event(&event, keyword);
        if self.shared.notifications_enabled() {
            self.shared
                .notifications
                .push(NotificationEvent::from(&record));
        }

        if let Some(transcript) = &session.transcript {
            if let Err(e) = transcript.record_trigger(&event) {
                warn!(stream = %event.stream, error = %e, "Failed to write trigger transcript");
            }
        }

        self.shared.triggers.record(record);
        self.shared.request_save(&event.stream);
    }
}
