//! # Peer Routing (Kademlia Routing Table)
//!
//! XOR-distance routing table mapping 160-bit node identifiers to contact
//! info. Gossip and sync consult it to pick targets; the node runtime feeds
//! it from peer connect/disconnect events and answers `find_node` from it.
//!
//! ## Architecture
//!
//! - **Domain Layer:** XOR distance, k-buckets, routing table (no I/O)
//! - **Ports Layer:** `RoutingApi` (driving), `TimeSource` (driven)
//! - **Service Layer:** `RoutingService`, lock + clock + maintenance task
//!
//! ## Example
//!
//! ```rust
//! use ec_01_peer_routing::{NodeMetadata, RoutingConfig, RoutingTable, Timestamp};
//! use shared_types::{NodeId, PeerInfo};
//!
//! let mut table = RoutingTable::new(NodeId::derive(b"local"), RoutingConfig::default());
//! let peer = PeerInfo::new(NodeId::derive(b"remote"), "10.0.0.2:30333");
//! table.add_node(peer, NodeMetadata::new(), Timestamp::new(1_000)).unwrap();
//!
//! let closest = table.get_closest_nodes(&NodeId::derive(b"target"), 20);
//! assert_eq!(closest.len(), 1);
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    calculate_bucket_index, xor_distance, Distance, InsertOutcome, KBucket, NodeMetadata,
    RoutingConfig, RoutingEntry, RoutingError, RoutingTable, Timestamp, NUM_BUCKETS,
};
pub use ports::{RoutingApi, TimeSource};
pub use service::RoutingService;
