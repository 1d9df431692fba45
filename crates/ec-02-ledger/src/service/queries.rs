//! Read side of the ledger.
//!
//! Not-found is `None` or empty, never an error. A storage failure on a
//! read is logged and reported as not-found.

use super::*;
use crate::domain::config::MAX_BLOCKS_PER_QUERY;
use crate::domain::validation::check_timestamp;
use shared_types::Transaction;
use std::ops::RangeInclusive;
use tracing::warn;

fn or_log<T>(result: Result<Option<T>, StorageError>, what: &str) -> Option<T> {
    result.unwrap_or_else(|e| {
        warn!("[ledger] Read of {} failed: {}", what, e);
        None
    })
}

impl Ledger {
    /// Height of the tip (0 before genesis).
    pub fn get_height(&self) -> u64 {
        self.tip().map(|t| t.height).unwrap_or(0)
    }

    /// Difficulty target for the next block.
    pub fn get_difficulty(&self) -> u32 {
        self.config.difficulty
    }

    pub fn get_block(&self, hash: &Hash) -> Option<Block> {
        or_log(self.load_block(hash), "block")
    }

    /// Best-chain block at `height`.
    pub fn get_block_by_height(&self, height: u64) -> Option<Block> {
        or_log(self.block_at_height(height), "block by height")
    }

    /// Best-chain blocks in `range`, stopping at the first missing height.
    ///
    /// At most `MAX_BLOCKS_PER_QUERY` blocks are returned.
    pub fn get_blocks(&self, range: RangeInclusive<u64>) -> Vec<Block> {
        range
            .take(MAX_BLOCKS_PER_QUERY as usize)
            .map_while(|height| self.get_block_by_height(height))
            .collect()
    }

    pub fn get_last_block(&self) -> Option<Block> {
        let tip = self.tip()?;
        self.get_block(&tip.hash)
    }

    /// Whether a block with this hash is stored (any branch).
    pub fn contains_block(&self, hash: &Hash) -> bool {
        self.store
            .read()
            .exists(&KeyPrefix::block_key(hash))
            .unwrap_or(false)
    }

    /// Hash of the best-chain block containing `tx_hash`.
    pub fn containing_block(&self, tx_hash: &Hash) -> Option<Hash> {
        or_log(self.indexed_transaction(tx_hash), "transaction index")
    }

    /// Admission check used by the mempool.
    pub fn is_valid_transaction(&self, tx: &Transaction) -> bool {
        self.validate_transaction(tx).is_ok()
    }

    /// Like `is_valid_transaction`, with the reason for rejection.
    pub fn validate_transaction(&self, tx: &Transaction) -> Result<(), LedgerError> {
        if !tx.has_valid_hash() {
            return Err(ValidationError::TransactionHashMismatch { hash: tx.hash }.into());
        }

        if self
            .store
            .read()
            .exists(&KeyPrefix::transaction_key(&tx.hash))?
        {
            return Err(ValidationError::AlreadyIncluded { hash: tx.hash }.into());
        }

        check_timestamp(
            tx.timestamp,
            self.time_source.now_millis(),
            self.config.max_future_drift_ms,
        )?;

        if !tx.is_coinbase() && !self.verifier.verify(tx) {
            return Err(ValidationError::InvalidSignature { hash: tx.hash }.into());
        }

        Ok(())
    }
}
