//! Outbound ports: the ledger and the mempool, as the miner sees them.

use async_trait::async_trait;
use shared_types::{Block, Transaction};

/// What happened to a submitted block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The block became the new tip.
    Accepted,
    /// Valid, but the tip moved while searching; the block did not extend it.
    Stale,
}

/// Ledger access for block production.
#[async_trait]
pub trait BlockSubmitter: Send + Sync {
    /// Current tip block.
    fn last_block(&self) -> Option<Block>;

    /// Difficulty target for the next block.
    fn difficulty(&self) -> u32;

    /// Hand a sealed block to the ledger. `Err(reason)` on rejection.
    async fn submit_block(&self, block: Block) -> Result<SubmitOutcome, String>;
}

/// Mempool access for block production.
pub trait TransactionSource: Send + Sync {
    /// Pending transactions, in inclusion order.
    fn pending_transactions(&self) -> Vec<Transaction>;

    /// Drop transactions now included in `block`.
    fn remove_included(&self, block: &Block);
}
