//! Mempool error types.

use shared_types::{short_hex, Hash};

/// Mempool error type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MempoolError {
    /// Transaction already exists in the pool.
    #[error("Duplicate transaction: {}", short_hex(.0))]
    DuplicateTransaction(Hash),

    /// The ledger refused the transaction.
    #[error("Transaction {} failed validation: {reason}", short_hex(.hash))]
    ValidationFailed { hash: Hash, reason: String },

    /// Pool has reached maximum capacity.
    #[error("Pool full at {capacity} transactions")]
    PoolFull { capacity: usize },
}

impl MempoolError {
    /// Every admission failure is specific to one transaction or transient.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}
