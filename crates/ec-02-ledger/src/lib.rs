//! # Ledger (ec-02)
//!
//! The authoritative, append-only chain of proof-of-work blocks.
//!
//! Every block passes the same gate before it is written: recomputed hash,
//! difficulty target, merkle commitment, parent linkage and a bounded clock
//! drift. Writes go to a `KeyValueStore` in a single atomic batch, and the
//! in-memory tip moves only after that batch commits.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Chain rules, errors, key layout
//! - `ports/` - `KeyValueStore` and `SignatureVerifier`
//! - `adapters/` - In-memory store and signature verifiers
//! - `service/` - `Ledger`, the application service
//!
//! ## Usage
//!
//! ```ignore
//! use ec_02_ledger::{InMemoryKVStore, Ledger, LedgerConfig, LedgerDependencies};
//!
//! let ledger = Ledger::new(deps, LedgerConfig::default());
//! if ledger.init()?.is_none() {
//!     ledger.seed_genesis(genesis).await?;
//! }
//! ledger.add_block(block).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{AcceptAllSignatures, Ed25519SignatureVerifier, InMemoryKVStore};
pub use domain::config::MAX_BLOCKS_PER_QUERY;
pub use domain::{AddBlockOutcome, ChainTip, KeyPrefix, LedgerConfig, LedgerError, ValidationError};
pub use ports::{BatchOperation, KeyValueStore, ScanResult, SignatureVerifier};
pub use service::{encode_block, Ledger, LedgerDependencies};
