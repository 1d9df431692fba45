//! # Gossip (ec-05)
//!
//! Spreads pending transactions and new blocks across the overlay by
//! epidemic push.
//!
//! ```text
//!   every interval                         inbound push from peer P
//!        │                                          │
//!        ↓                                          ↓
//!  pick `fanout` random peers            validate via ledger / mempool
//!        │                                          │ accepted
//!        ↓                                          ↓
//!  push pending txs + tip             relay to `fanout` random peers ≠ P
//! ```
//!
//! Delivery is best-effort: sends are timeout-bounded and failures are only
//! logged and counted.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{select_targets, GossipConfig, GossipError, GossipRound, GossipStats, SeenCache};
pub use ports::{BlockImport, ChainGateway, MempoolGateway, TxAdmission};
pub use service::{GossipService, InboundOutcome};
