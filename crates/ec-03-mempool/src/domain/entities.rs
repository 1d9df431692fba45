//! Mempool entities.

use serde::{Deserialize, Serialize};
use shared_types::{Hash, Transaction};

/// A pooled transaction and when it was admitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MempoolEntry {
    pub transaction: Transaction,
    /// Admission time (epoch ms).
    pub admitted_at: u64,
}

impl MempoolEntry {
    pub fn new(transaction: Transaction, admitted_at: u64) -> Self {
        Self {
            transaction,
            admitted_at,
        }
    }

    pub fn hash(&self) -> Hash {
        self.transaction.hash
    }
}

/// Mempool configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolConfig {
    /// Maximum transactions in the pool.
    pub max_size: usize,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self { max_size: 5000 }
    }
}

impl MempoolConfig {
    /// Creates a minimal config for testing.
    pub fn for_testing() -> Self {
        Self { max_size: 100 }
    }
}

/// Point-in-time pool statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolStatus {
    pub pending: usize,
    pub capacity: usize,
    /// Admission time of the oldest entry.
    pub oldest_admitted_at: Option<u64>,
}
