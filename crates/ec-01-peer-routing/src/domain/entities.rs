//! Core Domain Entities for the Routing Table

use serde::{Deserialize, Serialize};
use shared_types::{NodeId, PeerInfo};
use std::collections::BTreeMap;

/// Free-form metadata attached to a routing entry (client version, roles...).
pub type NodeMetadata = BTreeMap<String, String>;

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from epoch milliseconds.
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Epoch milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Add seconds (saturating).
    pub fn add_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs.saturating_mul(1000)))
    }

    /// Milliseconds elapsed since `earlier` (zero if `earlier` is in the future).
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// A peer stored in the routing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingEntry {
    /// Contact information.
    pub info: PeerInfo,
    /// Last time the peer was added, updated or seen.
    pub last_seen: Timestamp,
    /// Attached metadata.
    pub metadata: NodeMetadata,
}

impl RoutingEntry {
    /// Create a fresh entry.
    pub fn new(info: PeerInfo, metadata: NodeMetadata, now: Timestamp) -> Self {
        Self {
            info,
            last_seen: now,
            metadata,
        }
    }

    /// The peer's identifier.
    pub fn node_id(&self) -> &NodeId {
        &self.info.node_id
    }

    /// Whether the entry has outlived `ttl_secs` at `now`.
    pub fn is_stale(&self, now: Timestamp, ttl_secs: u64) -> bool {
        now.millis_since(self.last_seen) > ttl_secs.saturating_mul(1000)
    }
}
