//! # Handlers
//!
//! Long-running tasks that react to inbound traffic and bus events.

pub mod chain_events;
pub mod inbound;
pub mod peer_events;

pub use chain_events::ChainEventHandler;
pub use inbound::NodeMessageHandler;
pub use peer_events::PeerEventHandler;
