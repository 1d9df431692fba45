//! Routing Table Implementation
//!
//! Kademlia table: 160 k-buckets indexed by floor(log2(XOR distance)).

mod bucket;
mod table;

pub use bucket::KBucket;
pub use table::{InsertOutcome, RoutingTable};
