//! Context-free chain rules.
//!
//! Checks that need only the block itself (and the clock) live here. Rules
//! that need the store, such as parent lookup, run in the service against
//! the parent this module is handed.

use crate::domain::{LedgerConfig, ValidationError};
use shared_types::{meets_difficulty, Block, ZERO_HASH, MAX_DIFFICULTY};

/// Reject timestamps beyond `now + drift`.
pub fn check_timestamp(timestamp: u64, now_ms: u64, drift_ms: u64) -> Result<(), ValidationError> {
    let limit = now_ms.saturating_add(drift_ms);
    if timestamp > limit {
        return Err(ValidationError::TimestampTooFarInFuture { timestamp, limit });
    }
    Ok(())
}

/// Self-contained block checks: hash, work, merkle commitment, clock drift.
pub fn validate_block_structure(
    block: &Block,
    now_ms: u64,
    config: &LedgerConfig,
) -> Result<(), ValidationError> {
    if block.difficulty > MAX_DIFFICULTY {
        return Err(ValidationError::DifficultyOutOfRange {
            difficulty: block.difficulty,
            max: MAX_DIFFICULTY,
        });
    }

    let computed = block.recompute_hash();
    if computed != block.hash {
        return Err(ValidationError::HashMismatch {
            claimed: block.hash,
            computed,
        });
    }

    if !meets_difficulty(&block.hash, block.difficulty) {
        return Err(ValidationError::InsufficientWork {
            hash: block.hash,
            difficulty: block.difficulty,
        });
    }

    if let Some(index) = block.transactions.iter().position(|tx| !tx.has_valid_hash()) {
        return Err(ValidationError::InvalidTransactionHash { index });
    }

    let merkle = block.compute_merkle_root();
    if merkle != block.merkle_root {
        return Err(ValidationError::MerkleRootMismatch {
            header: block.merkle_root,
            computed: merkle,
        });
    }

    check_timestamp(block.timestamp, now_ms, config.max_future_drift_ms)?;

    if block.height == 0 && block.previous_hash != ZERO_HASH {
        return Err(ValidationError::InvalidGenesis);
    }

    Ok(())
}

/// Checks against the parent: existence, height continuity, minimum work.
///
/// Only called for non-genesis blocks.
pub fn validate_linkage(
    block: &Block,
    parent: Option<&Block>,
    config: &LedgerConfig,
) -> Result<(), ValidationError> {
    let parent = parent.ok_or(ValidationError::UnknownParent {
        parent: block.previous_hash,
    })?;

    let expected = parent.height + 1;
    if block.height != expected {
        return Err(ValidationError::HeightMismatch {
            expected,
            actual: block.height,
        });
    }

    if block.difficulty < config.min_difficulty {
        return Err(ValidationError::DifficultyTooLow {
            difficulty: block.difficulty,
            minimum: config.min_difficulty,
        });
    }

    Ok(())
}
