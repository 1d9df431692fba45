//! # Domain Errors
//!
//! `ValidationError` covers every chain rule a block or transaction can
//! break. `LedgerError` adds storage failures on top.

use shared_types::{short_hex, Hash, StorageError};
use thiserror::Error;

/// A block or transaction broke a chain rule. Nothing was written.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Stored hash differs from the recomputed header hash.
    #[error("Block hash mismatch: claimed {}, computed {}", short_hex(.claimed), short_hex(.computed))]
    HashMismatch { claimed: Hash, computed: Hash },

    /// Hash lacks the required leading zero hex digits.
    #[error("Insufficient work: hash {} does not meet difficulty {difficulty}", short_hex(.hash))]
    InsufficientWork { hash: Hash, difficulty: u32 },

    /// Difficulty beyond what a 32-byte hash can carry.
    #[error("Difficulty {difficulty} out of range (max {max})")]
    DifficultyOutOfRange { difficulty: u32, max: u32 },

    /// Non-genesis block below the configured minimum difficulty.
    #[error("Difficulty {difficulty} below minimum {minimum}")]
    DifficultyTooLow { difficulty: u32, minimum: u32 },

    /// Merkle root does not commit to the transaction list.
    #[error("Merkle root mismatch: header {}, computed {}", short_hex(.header), short_hex(.computed))]
    MerkleRootMismatch { header: Hash, computed: Hash },

    /// A transaction's hash does not match its fields.
    #[error("Transaction at index {index} has an invalid hash")]
    InvalidTransactionHash { index: usize },

    /// Referenced parent is not stored.
    #[error("Unknown parent block {}", short_hex(.parent))]
    UnknownParent { parent: Hash },

    /// Height is not parent height + 1.
    #[error("Height mismatch: expected {expected}, got {actual}")]
    HeightMismatch { expected: u64, actual: u64 },

    /// Genesis must reference the zero hash.
    #[error("Genesis block must have a zero previous hash")]
    InvalidGenesis,

    /// A different genesis is already stored.
    #[error("Genesis mismatch: ledger already rooted at {}", short_hex(.existing))]
    GenesisMismatch { existing: Hash },

    /// Timestamp beyond the allowed clock drift.
    #[error("Timestamp {timestamp} is too far in the future (limit {limit})")]
    TimestampTooFarInFuture { timestamp: u64, limit: u64 },

    /// A transaction's stored hash does not match its fields.
    #[error("Transaction hash mismatch for {}", short_hex(.hash))]
    TransactionHashMismatch { hash: Hash },

    /// Transaction is already part of a stored block.
    #[error("Transaction {} already included in a block", short_hex(.hash))]
    AlreadyIncluded { hash: Hash },

    /// Signature does not verify against the sender identity.
    #[error("Invalid signature on transaction {}", short_hex(.hash))]
    InvalidSignature { hash: Hash },
}

/// Errors returned by ledger writes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The block was rejected.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The store failed; the tip did not move.
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl LedgerError {
    /// Validation failures are per-block; storage failures are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_short_hex() {
        let err = ValidationError::UnknownParent { parent: [0xAB; 32] };
        assert_eq!(err.to_string(), "Unknown parent block abababababababab");
    }

    #[test]
    fn test_recoverability() {
        assert!(LedgerError::from(ValidationError::InvalidGenesis).is_recoverable());
        assert!(
            !LedgerError::from(StorageError::DatabaseError("disk".into())).is_recoverable()
        );
    }
}
