//! Value Objects for the Routing Table

use serde::{Deserialize, Serialize};
use shared_types::NODE_ID_LEN;

/// Number of k-buckets (one per bit of a 160-bit NodeId).
pub const NUM_BUCKETS: usize = NODE_ID_LEN * 8;

/// XOR distance between two node identifiers.
///
/// Compared as a big-endian integer, so the most significant differing bit
/// dominates. The zero distance is a node's distance to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Distance(pub [u8; NODE_ID_LEN]);

impl Distance {
    /// The zero distance.
    pub const ZERO: Self = Self([0u8; NODE_ID_LEN]);

    /// Number of significant bits (0 for the zero distance, up to 160).
    pub fn bit_length(&self) -> usize {
        for (i, byte) in self.0.iter().enumerate() {
            if *byte != 0 {
                return (NODE_ID_LEN - i) * 8 - byte.leading_zeros() as usize;
            }
        }
        0
    }

    /// floor(log2(distance)), clamped to `[0, NUM_BUCKETS - 1]`.
    pub fn bucket_index(&self) -> usize {
        self.bit_length().saturating_sub(1).min(NUM_BUCKETS - 1)
    }

    /// Whether this is the zero distance.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Configuration for the Kademlia routing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Bucket size (default: 20)
    pub k: usize,
    /// Entries unseen for longer than this are stale (default: 30 minutes)
    pub node_ttl_secs: u64,
    /// Maintenance sweep interval (default: 60 seconds)
    pub cleanup_interval_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            k: 20,
            node_ttl_secs: 30 * 60,
            cleanup_interval_secs: 60,
        }
    }
}

impl RoutingConfig {
    /// Create a config suitable for testing (smaller values)
    pub fn for_testing() -> Self {
        Self {
            k: 3,
            node_ttl_secs: 10,
            cleanup_interval_secs: 1,
        }
    }
}
