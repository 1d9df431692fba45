//! Outbound ports (SPI) for gossip.

use async_trait::async_trait;
use shared_types::{Block, Hash, Transaction};

/// What the ledger did with a gossiped block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockImport {
    /// The block is now on the best chain (appended or reorganized onto).
    Extended,
    /// Valid but stored on a side branch.
    Stored,
    /// Already present; nothing changed.
    Known,
    /// Failed validation.
    Rejected(String),
}

/// What the mempool did with a gossiped transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxAdmission {
    Admitted,
    /// Already pending.
    Known,
    /// Invalid, already included, or the pool is full.
    Rejected(String),
}

/// Ledger access for gossip.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Current tip block.
    fn last_block(&self) -> Option<Block>;

    fn contains_block(&self, hash: &Hash) -> bool;

    /// Validate and append.
    async fn import_block(&self, block: Block) -> BlockImport;
}

/// Mempool access for gossip.
#[async_trait]
pub trait MempoolGateway: Send + Sync {
    /// Pending snapshot in inclusion order.
    fn pending_transactions(&self) -> Vec<Transaction>;

    fn contains(&self, hash: &Hash) -> bool;

    /// Ledger-gated admission.
    async fn admit(&self, transaction: Transaction) -> TxAdmission;

    /// Drop transactions included in `block`. Returns how many were pending.
    fn remove_included(&self, block: &Block) -> usize;
}
