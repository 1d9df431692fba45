//! # Driving Ports (Inbound API)
//!
//! The API this crate exposes to the node runtime, gossip and sync.

use crate::domain::{InsertOutcome, NodeMetadata, RoutingEntry, RoutingError};
use shared_types::{NodeId, PeerInfo};

/// Primary API for the routing table.
///
/// All methods take `&self`; implementations serialize mutations internally
/// so the table can be shared across tasks.
pub trait RoutingApi: Send + Sync {
    /// Insert a newly discovered node (refreshes a known one).
    fn add_node(&self, info: PeerInfo, metadata: NodeMetadata)
        -> Result<InsertOutcome, RoutingError>;

    /// Upsert a node's contact info and metadata.
    fn update_node(
        &self,
        info: PeerInfo,
        metadata: NodeMetadata,
    ) -> Result<InsertOutcome, RoutingError>;

    /// Refresh `last_seen` for a known node. Unknown nodes are not added.
    fn touch_node(&self, node_id: &NodeId) -> Result<(), RoutingError>;

    /// Remove a node. Returns whether it was present.
    fn remove_node(&self, node_id: &NodeId) -> bool;

    /// Look up a node.
    fn get_node(&self, node_id: &NodeId) -> Option<RoutingEntry>;

    /// Up to `count` nodes in ascending XOR distance to `target`.
    fn get_closest_nodes(&self, target: &NodeId, count: usize) -> Vec<RoutingEntry>;

    /// Evict stale entries; returns the evicted ids.
    fn cleanup_stale_nodes(&self) -> Vec<NodeId>;

    /// Every known node.
    fn all_nodes(&self) -> Vec<RoutingEntry>;
}
