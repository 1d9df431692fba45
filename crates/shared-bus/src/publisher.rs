//! # Event Publisher
//!
//! Components publish through `Arc<dyn EventPublisher>`; the runtime owns
//! the concrete [`InMemoryEventBus`] and hands out receivers.

use crate::events::{EventFilter, EventTopic, NodeEvent};
use crate::subscriber::{EventStream, Interest, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `event`. Returns how many live receivers want its topic.
    async fn publish(&self, event: NodeEvent) -> usize;

    /// Events published so far, delivered or not.
    fn events_published(&self) -> u64;
}

/// Process-local bus over a `tokio::sync::broadcast` channel.
///
/// Filtering happens on the receiving side; the bus only tracks which
/// topics have live receivers.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<NodeEvent>,
    interest: Arc<Interest>,
    published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus whose receivers lag after `capacity` unread events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            interest: Arc::new(Interest::default()),
            published: AtomicU64::new(0),
            capacity,
        }
    }

    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let registration = self.interest.register(&filter);
        debug!(topics = ?filter.topics, "Subscription opened");
        Subscription::new(self.sender.subscribe(), filter, registration)
    }

    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        let registration = self.interest.register(&filter);
        EventStream::new(self.sender.subscribe(), filter, registration)
    }

    /// Open receivers of any kind.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Live receivers whose filter accepts `topic`.
    #[must_use]
    pub fn interested_in(&self, topic: EventTopic) -> usize {
        self.interest.for_topic(topic)
    }

    /// Topic registrations currently held by receivers.
    #[must_use]
    pub fn tracked_subscriptions(&self) -> usize {
        self.interest.total()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: NodeEvent) -> usize {
        let topic = event.topic();
        self.published.fetch_add(1, Ordering::Relaxed);

        if self.sender.send(event).is_err() {
            trace!(topic = ?topic, "No receiver for event");
            return 0;
        }
        let wanted = self.interest.for_topic(topic);
        trace!(topic = ?topic, receivers = wanted, "Event published");
        wanted
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
