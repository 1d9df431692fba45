//! # Network Messages
//!
//! Payloads exchanged between peers. Framing belongs to the transport; these
//! are the typed bodies it carries.

use crate::block::Block;
use crate::entities::{NodeId, PeerInfo};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// Every message kind a node sends or receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetworkMessage {
    /// Gossiped pending transaction.
    NewTransaction { transaction: Transaction },
    /// Gossiped block (new tip or relay).
    NewBlock { block: Block },
    /// Ask a peer for its chain height.
    HeightRequest,
    /// Reply to `HeightRequest`.
    HeightResponse { height: u64 },
    /// Ask a peer for the block at `height`.
    BlockRequest { height: u64 },
    /// Reply to `BlockRequest`; `None` when the peer lacks that height.
    BlockResponse { block: Option<Block> },
    /// Kademlia lookup for `target`.
    FindNode { target: NodeId },
    /// Reply to `FindNode`.
    FindNodeResponse {
        found: bool,
        node: Option<PeerInfo>,
        closest_nodes: Vec<PeerInfo>,
    },
}

impl NetworkMessage {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NewTransaction { .. } => "new_transaction",
            Self::NewBlock { .. } => "new_block",
            Self::HeightRequest => "height_request",
            Self::HeightResponse { .. } => "height_response",
            Self::BlockRequest { .. } => "block_request",
            Self::BlockResponse { .. } => "block_response",
            Self::FindNode { .. } => "find_node",
            Self::FindNodeResponse { .. } => "find_node_response",
        }
    }

    /// Whether the sender expects a reply.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Self::HeightRequest | Self::BlockRequest { .. } | Self::FindNode { .. }
        )
    }

    /// Encode as JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
