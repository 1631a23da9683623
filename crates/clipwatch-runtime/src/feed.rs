//! Chat feed capability interface.
//!
//! The coordinator never speaks a chat provider's protocol itself. Anything
//! that can connect to one stream's chat, report when it is live, and hand
//! over messages can back a session.

use std::sync::Arc;

use async_trait::async_trait;
use clipwatch_models::{ChatEvent, StreamIdentity};

use crate::error::SessionError;

/// Called once the feed is live.
pub type ConnectedHandler = Arc<dyn Fn(&StreamIdentity) + Send + Sync>;

/// Called for every chat message received.
pub type MessageHandler = Arc<dyn Fn(ChatEvent) + Send + Sync>;

/// A connection to one stream's chat.
///
/// Handlers are registered before [`connect`](ChatFeed::connect) is called.
#[async_trait]
pub trait ChatFeed: Send + Sync {
    fn on_connected(&self, handler: ConnectedHandler);

    fn on_message(&self, handler: MessageHandler);

    /// Connects and listens until the feed ends.
    ///
    /// Resolves with `Ok(())` when the connection closes (remote end or
    /// [`disconnect`](ChatFeed::disconnect)), and with an error if the
    /// handshake fails. There is no timeout on the handshake.
    async fn connect(&self) -> Result<(), SessionError>;

    /// Requests disconnection without waiting for it to complete.
    fn disconnect(&self);

    fn is_connected(&self) -> bool;
}

/// Creates feeds for stream identities.
pub trait ChatFeedConnector: Send + Sync {
    fn create(&self, identity: &StreamIdentity) -> Arc<dyn ChatFeed>;
}
