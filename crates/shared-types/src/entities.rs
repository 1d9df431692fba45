//! # Core Domain Entities
//!
//! Identifiers and networking entities shared by every component.
//!
//! ## Clusters
//!
//! - **Chain**: `Hash` (see `transaction` and `block` for the sealed values)
//! - **Networking**: `NodeId`, `PeerId`, `PeerInfo`

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// The all-zero hash, used as the genesis parent and the empty merkle root.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Lowercase hex rendering of a hash.
pub fn hash_to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// First 8 bytes of a hash as hex, for log lines.
pub fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..8])
}

/// Parse a 64-character hex string into a hash.
pub fn hash_from_hex(s: &str) -> Option<Hash> {
    let bytes = hex::decode(s).ok()?;
    bytes.try_into().ok()
}

// =============================================================================
// CLUSTER B: NETWORKING
// =============================================================================

/// Length of a node identifier in bytes (160 bits).
pub const NODE_ID_LEN: usize = 20;

/// Unique identifier for a node in the overlay.
///
/// Identifiers live in the 160-bit Kademlia keyspace.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct NodeId(pub [u8; NODE_ID_LEN]);

impl NodeId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; NODE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }

    /// Parse from a 40-character hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        bytes.try_into().ok().map(Self)
    }

    /// Derive an identifier from arbitrary seed material (first 20 bytes of SHA-256).
    pub fn derive(seed: &[u8]) -> Self {
        use sha2::{Digest, Sha256};
        let digest: Hash = Sha256::digest(seed).into();
        let mut id = [0u8; NODE_ID_LEN];
        id.copy_from_slice(&digest[..NODE_ID_LEN]);
        Self(id)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A peer identifier (alias for `NodeId` in peer contexts).
pub type PeerId = NodeId;

/// Contact information for a peer in the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    /// The peer's node ID.
    pub node_id: NodeId,
    /// Network address (IP:Port or transport-specific locator).
    pub address: String,
}

impl PeerInfo {
    /// Create contact info for a peer.
    pub fn new(node_id: NodeId, address: impl Into<String>) -> Self {
        Self {
            node_id,
            address: address.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_hex_roundtrip() {
        let id = NodeId::derive(b"node-a");
        let parsed = NodeId::from_hex(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_node_id_rejects_wrong_length() {
        assert!(NodeId::from_hex("abcd").is_none());
        assert!(NodeId::from_hex("zz").is_none());
    }

    #[test]
    fn test_hash_hex_helpers() {
        let mut hash = ZERO_HASH;
        hash[0] = 0xAB;
        assert_eq!(&hash_to_hex(&hash)[..2], "ab");
        assert_eq!(short_hex(&hash).len(), 16);
        assert_eq!(hash_from_hex(&hash_to_hex(&hash)), Some(hash));
    }
}
