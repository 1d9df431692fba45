//! # Shared Types Crate
//!
//! Domain entities, wire messages and the transport port shared by every
//! Ember-Chain component.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: hashing and encoding rules for transactions
//!   and blocks live here and nowhere else.
//! - **Sealed values**: a `Transaction` or `Block` carries its hash; the
//!   `has_valid_*` checks recompute it from the fields.
//! - **Ports, not engines**: the transport is a trait; adapters live in the
//!   node runtime.

pub mod block;
pub mod entities;
pub mod errors;
pub mod merkle;
pub mod message;
pub mod time;
pub mod transaction;
pub mod transport;

pub use block::{
    compute_block_hash, leading_zero_nibbles, meets_difficulty, merkle_root_of, Block, BlockDraft,
    MAX_DIFFICULTY,
};
pub use entities::*;
pub use errors::*;
pub use merkle::{MerkleProof, MerkleTree, ProofNode, SiblingPosition};
pub use message::NetworkMessage;
pub use time::{FixedTimeSource, SystemTimeSource, TimeSource, HOUR_MS};
pub use transaction::{Transaction, COINBASE_SENDER};
pub use transport::{PeerTransport, TransportError};
