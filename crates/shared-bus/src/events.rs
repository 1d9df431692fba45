//! # Node Events
//!
//! Typed notifications that flow through the shared bus between node
//! components.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Hash, PeerId, PeerInfo};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeEvent {
    // =========================================================================
    // CHAIN
    // =========================================================================
    /// The ledger appended a block (from mining, gossip or sync).
    BlockAdded {
        /// Appended block hash.
        hash: Hash,
        /// Appended block height.
        height: u64,
        /// Whether the append replaced the previous tip's branch.
        reorg: bool,
        /// Earlier blocks that joined the best chain together with this one,
        /// oldest first. Empty unless `reorg`.
        connected: Vec<Hash>,
    },

    /// Genesis was written to an empty ledger.
    GenesisInitialized {
        /// Hash of the genesis block.
        hash: Hash,
    },

    // =========================================================================
    // MEMPOOL
    // =========================================================================
    /// A transaction was admitted to the mempool.
    TransactionAdded {
        /// Transaction hash.
        hash: Hash,
    },

    // =========================================================================
    // MINING
    // =========================================================================
    /// The local miner sealed a block that the ledger accepted.
    BlockMined {
        /// Mined block hash.
        hash: Hash,
        /// Mined block height.
        height: u64,
        /// Winning nonce.
        nonce: u64,
    },

    /// Mining loop started.
    MiningStarted,

    /// Mining loop stopped.
    MiningStopped,

    // =========================================================================
    // PEERS
    // =========================================================================
    /// Transport established a session with a peer.
    PeerConnected(PeerInfo),

    /// Transport lost a peer.
    PeerDisconnected(PeerId),

    // =========================================================================
    // SYNC
    // =========================================================================
    /// A sync cycle finished.
    SyncCompleted {
        /// Blocks appended during the cycle.
        applied: u64,
        /// Local height afterwards.
        height: u64,
    },
}

impl NodeEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::BlockAdded { .. } | Self::GenesisInitialized { .. } => EventTopic::Chain,
            Self::TransactionAdded { .. } => EventTopic::Mempool,
            Self::BlockMined { .. } | Self::MiningStarted | Self::MiningStopped => {
                EventTopic::Mining
            }
            Self::PeerConnected(_) | Self::PeerDisconnected(_) => EventTopic::Peers,
            Self::SyncCompleted { .. } => EventTopic::Sync,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Ledger events.
    Chain,
    /// Mempool events.
    Mempool,
    /// Miner events.
    Mining,
    /// Peer lifecycle events.
    Peers,
    /// Sync manager events.
    Sync,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &NodeEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
