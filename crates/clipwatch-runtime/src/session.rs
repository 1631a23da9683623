//! Stream sessions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clipwatch_models::{ChatEvent, SessionState, StreamIdentity};
use clipwatch_persistence::Transcript;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::event_loop::LoopCommand;
use crate::feed::ChatFeed;

/// One monitored stream, owned by the event loop.
///
/// `generation` tells this session apart from earlier or later sessions for
/// the same identity, so late reports from a replaced feed are ignored.
pub(crate) struct StreamSession {
    pub identity: StreamIdentity,
    pub generation: u64,
    pub transcript: Option<Transcript>,
    feed: Arc<dyn ChatFeed>,
    cancelled: Arc<AtomicBool>,
}

impl StreamSession {
    /// Wires the feed's handlers to the loop and spawns its connection task
    /// on the current runtime.
    pub fn spawn(
        identity: StreamIdentity,
        generation: u64,
        feed: Arc<dyn ChatFeed>,
        transcript: Option<Transcript>,
        loop_tx: UnboundedSender<LoopCommand>,
    ) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));

        {
            let cancelled = Arc::clone(&cancelled);
            let tx = loop_tx.clone();
            let id = identity.clone();
            feed.on_connected(Arc::new(move |_: &StreamIdentity| {
                if !cancelled.load(Ordering::SeqCst) {
                    let _ = tx.send(LoopCommand::Connected {
                        identity: id.clone(),
                        generation,
                    });
                }
            }));
        }

        {
            let cancelled = Arc::clone(&cancelled);
            let tx = loop_tx.clone();
            let id = identity.clone();
            feed.on_message(Arc::new(move |mut event: ChatEvent| {
                if cancelled.load(Ordering::SeqCst) {
                    return;
                }
                event.stream = id.clone();
                let _ = tx.send(LoopCommand::Chat { event, generation });
            }));
        }

        let task_feed = Arc::clone(&feed);
        let id = identity.clone();
        tokio::spawn(async move {
            let result = task_feed.connect().await;
            debug!(stream = %id, generation, ok = result.is_ok(), "Chat feed finished");
            let _ = loop_tx.send(LoopCommand::Ended {
                identity: id,
                generation,
                result,
            });
        });

        Self {
            identity,
            generation,
            transcript,
            feed,
            cancelled,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.feed.is_connected() {
            SessionState::Connected
        } else {
            SessionState::Connecting
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Stops forwarding events and asks the feed to disconnect. Returns
    /// without waiting for the connection to close.
    pub fn shut_down(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.feed.disconnect();
        debug!(stream = %self.identity, generation = self.generation, "Session shut down");
    }
}
