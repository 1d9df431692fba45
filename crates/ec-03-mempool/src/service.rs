//! # Mempool Service
//!
//! Wraps `TransactionPool` with a mutex, the ledger validator and the event
//! bus. Validation runs before the lock is taken; the duplicate check, the
//! capacity check and the insert run under it, so concurrent deliveries of
//! one transaction admit it exactly once.
//!
//! A block can land between validation and insert. Its `remove_included`
//! takes the same lock, so inclusion is asked again under the lock: either
//! the block is indexed and the insert is refused, or the insert happens
//! first and the block's cleanup removes it.

use crate::domain::{MempoolConfig, MempoolEntry, MempoolError, MempoolStatus, TransactionPool};
use crate::ports::TransactionValidator;
use parking_lot::Mutex;
use shared_bus::{EventPublisher, NodeEvent};
use shared_types::{short_hex, Block, Hash, TimeSource, Transaction};
use std::sync::Arc;
use tracing::{debug, info};

/// The shared transaction pool.
pub struct Mempool {
    pool: Mutex<TransactionPool>,
    validator: Arc<dyn TransactionValidator>,
    events: Arc<dyn EventPublisher>,
    time_source: Arc<dyn TimeSource>,
}

impl Mempool {
    pub fn new(
        config: MempoolConfig,
        validator: Arc<dyn TransactionValidator>,
        events: Arc<dyn EventPublisher>,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            pool: Mutex::new(TransactionPool::new(config)),
            validator,
            events,
            time_source,
        }
    }

    /// Admit a transaction.
    ///
    /// # Errors
    /// - `DuplicateTransaction`: already pooled
    /// - `ValidationFailed`: the ledger rejected it
    /// - `PoolFull`: at `max_size`
    pub async fn add_transaction(&self, tx: Transaction) -> Result<Hash, MempoolError> {
        if self.contains(&tx.hash) {
            return Err(MempoolError::DuplicateTransaction(tx.hash));
        }

        self.validator
            .validate(&tx)
            .map_err(|reason| MempoolError::ValidationFailed {
                hash: tx.hash,
                reason,
            })?;

        let now = self.time_source.now_millis();
        let hash = {
            let mut pool = self.pool.lock();
            if self.validator.is_included(&tx.hash) {
                return Err(MempoolError::ValidationFailed {
                    hash: tx.hash,
                    reason: "already included in a block".into(),
                });
            }
            pool.add(MempoolEntry::new(tx, now))?
        };

        debug!("[mempool] Admitted {} ({} pending)", short_hex(&hash), self.len());
        self.events.publish(NodeEvent::TransactionAdded { hash }).await;
        Ok(hash)
    }

    /// Remove a transaction. Returns whether it was pooled.
    pub fn remove_transaction(&self, hash: &Hash) -> bool {
        self.pool.lock().remove(hash).is_some()
    }

    /// Drop every transaction included in `block`.
    pub fn remove_included(&self, block: &Block) -> usize {
        let hashes = block.transaction_hashes();
        let removed = self.pool.lock().remove_many(hashes.iter()).len();
        if removed > 0 {
            info!(
                "[mempool] Removed {} transaction(s) included in block #{}",
                removed, block.height
            );
        }
        removed
    }

    /// Snapshot ordered by admission time, then hash.
    pub fn get_pending_transactions(&self) -> Vec<Transaction> {
        self.pool.lock().snapshot()
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.pool.lock().contains(hash)
    }

    pub fn len(&self) -> usize {
        self.pool.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.lock().is_empty()
    }

    pub fn status(&self) -> MempoolStatus {
        self.pool.lock().status()
    }
}
