//! # Domain Layer
//!
//! Pure chain rules for the ledger. No I/O.
//!
//! - `config` - Ledger configuration (difficulty target, drift bound)
//! - `errors` - Validation and ledger error types
//! - `keys` - Storage key layout
//! - `validation` - Context-free block and transaction checks
//! - `entities` - Chain tip and append outcomes

pub mod config;
pub mod entities;
pub mod errors;
pub mod keys;
pub mod validation;

pub use config::LedgerConfig;
pub use entities::{AddBlockOutcome, ChainTip};
pub use errors::{LedgerError, ValidationError};
pub use keys::KeyPrefix;
