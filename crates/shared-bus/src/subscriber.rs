//! # Subscriptions
//!
//! Every receiver handed out by the bus registers its topics in a shared
//! [`Interest`] table and releases them on drop, so the publisher knows how
//! many live receivers actually want a given event.

use crate::events::{EventFilter, EventTopic, NodeEvent};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{trace, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Every sender is gone.
    #[error("Event bus closed")]
    Closed,
}

/// Live receivers per topic. A catch-all filter counts under `EventTopic::All`.
#[derive(Debug, Default)]
pub(crate) struct Interest {
    counts: Mutex<HashMap<EventTopic, usize>>,
}

impl Interest {
    fn keys(filter: &EventFilter) -> Vec<EventTopic> {
        if filter.topics.is_empty() || filter.topics.contains(&EventTopic::All) {
            vec![EventTopic::All]
        } else {
            let mut keys = filter.topics.clone();
            keys.sort_by_key(|t| *t as u8);
            keys.dedup();
            keys
        }
    }

    pub(crate) fn register(self: &Arc<Self>, filter: &EventFilter) -> Registration {
        let keys = Self::keys(filter);
        let mut counts = self.counts.lock();
        for key in &keys {
            *counts.entry(*key).or_insert(0) += 1;
        }
        Registration {
            interest: Arc::clone(self),
            keys,
        }
    }

    /// Receivers that will keep an event of `topic`.
    pub(crate) fn for_topic(&self, topic: EventTopic) -> usize {
        let counts = self.counts.lock();
        let specific = if topic == EventTopic::All {
            0
        } else {
            counts.get(&topic).copied().unwrap_or(0)
        };
        specific + counts.get(&EventTopic::All).copied().unwrap_or(0)
    }

    pub(crate) fn total(&self) -> usize {
        // A receiver registered under several topics is counted once per topic.
        self.counts.lock().values().sum()
    }
}

/// Releases a receiver's topics when dropped.
pub(crate) struct Registration {
    interest: Arc<Interest>,
    keys: Vec<EventTopic>,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let mut counts = self.interest.counts.lock();
        for key in &self.keys {
            if let Some(count) = counts.get_mut(key) {
                *count -= 1;
                if *count == 0 {
                    counts.remove(key);
                }
            }
        }
        trace!(topics = ?self.keys, "Receiver released");
    }
}

/// Pull-style receiver of filtered events.
pub struct Subscription {
    receiver: broadcast::Receiver<NodeEvent>,
    filter: EventFilter,
    missed: u64,
    _registration: Registration,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<NodeEvent>,
        filter: EventFilter,
        registration: Registration,
    ) -> Self {
        Self {
            receiver,
            filter,
            missed: 0,
            _registration: registration,
        }
    }

    /// Next matching event. `None` once the bus is gone.
    ///
    /// Events overwritten while this receiver lagged are skipped and
    /// counted in [`Self::missed`].
    pub async fn recv(&mut self) -> Option<NodeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(count)) => self.note_lag(count),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching event if one is already buffered.
    pub fn try_recv(&mut self) -> Result<Option<NodeEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => {}
                Err(TryRecvError::Lagged(count)) => self.note_lag(count),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
            }
        }
    }

    /// Events lost to lag since this subscription was created.
    pub fn missed(&self) -> u64 {
        self.missed
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    fn note_lag(&mut self, count: u64) {
        self.missed += count;
        warn!(
            lagged = count,
            topics = ?self.filter.topics,
            "Subscriber fell behind, events dropped"
        );
    }
}

/// Push-style receiver of filtered events.
pub struct EventStream {
    filter: EventFilter,
    inner: Pin<Box<dyn Stream<Item = NodeEvent> + Send>>,
    _registration: Registration,
}

impl EventStream {
    pub(crate) fn new(
        receiver: broadcast::Receiver<NodeEvent>,
        filter: EventFilter,
        registration: Registration,
    ) -> Self {
        let keep = filter.clone();
        let inner = BroadcastStream::new(receiver)
            .filter_map(move |item| item.ok().filter(|event| keep.matches(event)));
        Self {
            filter,
            inner: Box::pin(inner),
            _registration: registration,
        }
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Stream for EventStream {
    type Item = NodeEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}
