//! # Shared Bus
//!
//! Typed in-process pub/sub between node components. Producers (ledger,
//! mempool, miner, sync, transport hub) publish [`NodeEvent`]s; the runtime's
//! handlers subscribe by [`EventTopic`].
//!
//! ```text
//!  Ledger ─┐                         ┌─> PeerEventHandler  (Peers)
//!  Miner  ─┼─ publish ─> [ bus ] ────┼─> ChainEventHandler (Chain, Mining)
//!  Hub    ─┘                         └─> tests, logging    (All)
//! ```
//!
//! Delivery is best effort: a receiver that falls `capacity` events behind
//! loses the oldest ones and sees the gap in `Subscription::missed`.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, NodeEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Unread events buffered per receiver before it lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
