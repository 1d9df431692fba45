//! Domain Layer - Pure routing logic with no I/O
//!
//! - Node identifiers and XOR distance
//! - Routing table with k-buckets
//! - Staleness eviction

pub mod distance;
pub mod entities;
pub mod errors;
pub mod routing_table;
pub mod value_objects;

pub use distance::*;
pub use entities::*;
pub use errors::*;
pub use routing_table::*;
pub use value_objects::*;
