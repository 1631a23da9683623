//! In-process chat feed.
//!
//! [`LoopbackHub`] hands out [`LoopbackFeed`]s and lets callers push chat
//! messages into them, so the coordinator can run without a live chat
//! provider. Used by tests and by the dry-run message endpoint.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use clipwatch_models::{ChatEvent, StreamIdentity};
use tokio::sync::{mpsc, Notify};
use tracing::debug;

use crate::error::SessionError;
use crate::feed::{ChatFeed, ChatFeedConnector, ConnectedHandler, MessageHandler};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Chat feed fed by [`LoopbackHub::inject`].
pub struct LoopbackFeed {
    identity: StreamIdentity,
    connect_delay: Duration,
    refuse: bool,
    connected: AtomicBool,
    shutdown: Notify,
    inbox_tx: mpsc::UnboundedSender<ChatEvent>,
    inbox_rx: Mutex<Option<mpsc::UnboundedReceiver<ChatEvent>>>,
    on_connected: Mutex<Option<ConnectedHandler>>,
    on_message: Mutex<Option<MessageHandler>>,
}

impl LoopbackFeed {
    fn new(identity: StreamIdentity, connect_delay: Duration, refuse: bool) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            identity,
            connect_delay,
            refuse,
            connected: AtomicBool::new(false),
            shutdown: Notify::new(),
            inbox_tx,
            inbox_rx: Mutex::new(Some(inbox_rx)),
            on_connected: Mutex::new(None),
            on_message: Mutex::new(None),
        }
    }

    fn push(&self, event: ChatEvent) -> bool {
        self.is_connected() && self.inbox_tx.send(event).is_ok()
    }
}

#[async_trait]
impl ChatFeed for LoopbackFeed {
    fn on_connected(&self, handler: ConnectedHandler) {
        *lock(&self.on_connected) = Some(handler);
    }

    fn on_message(&self, handler: MessageHandler) {
        *lock(&self.on_message) = Some(handler);
    }

    async fn connect(&self) -> Result<(), SessionError> {
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        if self.refuse {
            return Err(SessionError::Connect(format!(
                "{} is not live",
                self.identity
            )));
        }
        let mut inbox = lock(&self.inbox_rx)
            .take()
            .ok_or_else(|| SessionError::Connect("feed already used".to_string()))?;

        self.connected.store(true, Ordering::SeqCst);
        let connected = lock(&self.on_connected).clone();
        if let Some(handler) = connected {
            handler(&self.identity);
        }

        loop {
            tokio::select! {
                _ = self.shutdown.notified() => break,
                event = inbox.recv() => match event {
                    Some(event) => {
                        let handler = lock(&self.on_message).clone();
                        if let Some(handler) = handler {
                            handler(event);
                        }
                    }
                    None => break,
                },
            }
        }

        self.connected.store(false, Ordering::SeqCst);
        debug!(stream = %self.identity, "Loopback feed closed");
        Ok(())
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct HubState {
    feeds: HashMap<StreamIdentity, Arc<LoopbackFeed>>,
    offline: HashSet<StreamIdentity>,
    connect_delay: Duration,
}

/// Creates loopback feeds and routes injected messages to them.
#[derive(Clone, Default)]
pub struct LoopbackHub {
    state: Arc<Mutex<HubState>>,
}

impl LoopbackHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every subsequent connection by `delay`.
    pub fn set_connect_delay(&self, delay: Duration) {
        lock(&self.state).connect_delay = delay;
    }

    /// Makes connections for `identity` fail (or succeed again).
    pub fn set_offline(&self, identity: impl Into<StreamIdentity>, offline: bool) {
        let identity = identity.into();
        let mut state = lock(&self.state);
        if offline {
            state.offline.insert(identity);
        } else {
            state.offline.remove(&identity);
        }
    }

    fn feed(&self, identity: &StreamIdentity) -> Option<Arc<LoopbackFeed>> {
        lock(&self.state).feeds.get(identity).cloned()
    }

    /// Delivers `event` to the live feed for `event.stream`.
    ///
    /// Returns false if no feed for that stream is connected.
    pub fn inject(&self, event: ChatEvent) -> bool {
        match self.feed(&event.stream) {
            Some(feed) => feed.push(event),
            None => false,
        }
    }

    /// Shorthand for injecting a message from `chatter`.
    pub fn say(&self, identity: &str, chatter: &str, text: &str) -> bool {
        self.inject(ChatEvent::new(identity, chatter, text))
    }

    /// Closes the live feed for `identity` from the provider side.
    pub fn drop_connection(&self, identity: &StreamIdentity) {
        if let Some(feed) = self.feed(identity) {
            feed.disconnect();
        }
    }

    pub fn is_connected(&self, identity: &StreamIdentity) -> bool {
        self.feed(identity).is_some_and(|f| f.is_connected())
    }
}

impl ChatFeedConnector for LoopbackHub {
    fn create(&self, identity: &StreamIdentity) -> Arc<dyn ChatFeed> {
        let mut state = lock(&self.state);
        let refuse = state.offline.contains(identity);
        let feed = Arc::new(LoopbackFeed::new(
            identity.clone(),
            state.connect_delay,
            refuse,
        ));
        state.feeds.insert(identity.clone(), Arc::clone(&feed));
        feed
    }
}
