//! # Transaction Pool
//!
//! ## Data Structures
//!
//! - `by_hash`: O(1) lookup by transaction hash
//! - `by_arrival`: admission-ordered index `(admitted_at, hash)`
//!
//! ## Invariants Enforced
//!
//! - No duplicate hashes (checked in `add()`)
//! - Never more than `max_size` entries (checked in `add()`)
//! - Both indices always hold the same hash set

use super::entities::{MempoolConfig, MempoolEntry, MempoolStatus};
use super::errors::MempoolError;
use shared_types::{Hash, Transaction};
use std::collections::{BTreeSet, HashMap};

/// Bounded pool of pending transactions.
#[derive(Debug)]
pub struct TransactionPool {
    config: MempoolConfig,
    by_hash: HashMap<Hash, MempoolEntry>,
    by_arrival: BTreeSet<(u64, Hash)>,
}

impl TransactionPool {
    /// Creates a new empty transaction pool.
    pub fn new(config: MempoolConfig) -> Self {
        Self {
            config,
            by_hash: HashMap::new(),
            by_arrival: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> &MempoolConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.by_hash.contains_key(hash)
    }

    pub fn get(&self, hash: &Hash) -> Option<&MempoolEntry> {
        self.by_hash.get(hash)
    }

    /// Adds a transaction to the pool.
    ///
    /// # Errors
    /// - `DuplicateTransaction` if hash already exists
    /// - `PoolFull` if at capacity
    pub fn add(&mut self, entry: MempoolEntry) -> Result<Hash, MempoolError> {
        let hash = entry.hash();
        if self.by_hash.contains_key(&hash) {
            return Err(MempoolError::DuplicateTransaction(hash));
        }
        if self.by_hash.len() >= self.config.max_size {
            return Err(MempoolError::PoolFull {
                capacity: self.config.max_size,
            });
        }

        self.by_arrival.insert((entry.admitted_at, hash));
        self.by_hash.insert(hash, entry);
        Ok(hash)
    }

    /// Removes a transaction. Removing an absent hash is a no-op.
    pub fn remove(&mut self, hash: &Hash) -> Option<MempoolEntry> {
        let entry = self.by_hash.remove(hash)?;
        self.by_arrival.remove(&(entry.admitted_at, *hash));
        Some(entry)
    }

    /// Removes every listed hash; returns those that were present.
    pub fn remove_many<'a>(&mut self, hashes: impl IntoIterator<Item = &'a Hash>) -> Vec<Hash> {
        hashes
            .into_iter()
            .filter_map(|h| self.remove(h).map(|_| *h))
            .collect()
    }

    /// Transactions ordered by admission time, then hash.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.by_arrival
            .iter()
            .filter_map(|(_, hash)| self.by_hash.get(hash))
            .map(|entry| entry.transaction.clone())
            .collect()
    }

    pub fn status(&self) -> MempoolStatus {
        MempoolStatus {
            pending: self.len(),
            capacity: self.config.max_size,
            oldest_admitted_at: self.by_arrival.iter().next().map(|(at, _)| *at),
        }
    }
}
