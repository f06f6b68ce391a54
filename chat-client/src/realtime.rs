//! Realtime channel abstraction.
//!
//! The engine consumes the channel, it does not own it: outbound publishes
//! are fire-and-forget (no acknowledgment is awaited), and inbound events
//! arrive on a subscription that the caller pumps into
//! [`crate::ConversationSession::apply_event`].

use async_trait::async_trait;
use chat_types::ChannelEvent;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Fan-out buffer size for in-process channels.
const CHANNEL_CAPACITY: usize = 64;

/// A bidirectional realtime event channel to the backend.
#[async_trait]
pub trait RealtimeChannel: Send + Sync {
    /// Publish an event. Fire-and-forget: delivery is not acknowledged and
    /// failures are logged, never surfaced.
    async fn publish(&self, event: ChannelEvent);

    /// Subscribe to inbound events.
    fn subscribe(&self) -> broadcast::Receiver<ChannelEvent>;
}

/// An in-process loopback channel.
///
/// `publish` echoes the event to every subscriber, standing in for the
/// backend's echo-broadcast: a client that publishes a `send_message` also
/// receives it back, exactly like the real channel. Used by tests, demos
/// and the CLI's mock mode.
#[derive(Debug, Clone)]
pub struct LocalChannel {
    tx: broadcast::Sender<ChannelEvent>,
}

impl LocalChannel {
    /// Create a loopback channel.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl Default for LocalChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeChannel for LocalChannel {
    async fn publish(&self, event: ChannelEvent) {
        match self.tx.send(event) {
            Ok(subscribers) => {
                tracing::debug!("event delivered to {subscribers} subscribers");
            }
            Err(_) => {
                tracing::debug!("no subscribers to receive event");
            }
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.tx.subscribe()
    }
}

/// Mock channel for testing.
///
/// Records published events instead of echoing them, and lets tests inject
/// inbound events as if another participant had produced them. The two
/// directions are kept separate so a test can exercise the self-echo case
/// explicitly.
#[derive(Debug, Clone)]
pub struct MockChannel {
    published: Arc<Mutex<Vec<ChannelEvent>>>,
    tx: broadcast::Sender<ChannelEvent>,
}

impl MockChannel {
    /// Create a new mock channel.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            published: Arc::new(Mutex::new(Vec::new())),
            tx,
        }
    }

    /// All events published so far.
    pub fn published(&self) -> Vec<ChannelEvent> {
        self.published.lock().unwrap().clone()
    }

    /// Deliver an inbound event to all subscribers, as if it came from
    /// another participant (or the backend's echo of our own publish).
    pub fn inject(&self, event: ChannelEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeChannel for MockChannel {
    async fn publish(&self, event: ChannelEvent) {
        self.published.lock().unwrap().push(event);
    }

    fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.tx.subscribe()
    }
}
