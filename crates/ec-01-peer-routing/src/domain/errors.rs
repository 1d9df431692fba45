//! Domain Errors for the Routing Table

use shared_types::NodeId;
use std::fmt;

/// Errors that can occur during routing table operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// Node not found in routing table
    NodeNotFound(NodeId),
    /// K-bucket is at capacity and holds no stale entry to replace
    BucketFull { bucket: usize },
    /// Attempted to add the local node to its own table
    SelfInsertion,
}

impl RoutingError {
    /// Whether the caller can retry later (e.g. after stale entries expire).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::BucketFull { .. })
    }
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "Node {id} not found in routing table"),
            Self::BucketFull { bucket } => write!(f, "K-bucket {bucket} is at capacity"),
            Self::SelfInsertion => write!(f, "Cannot add local node to routing table"),
        }
    }
}

impl std::error::Error for RoutingError {}
