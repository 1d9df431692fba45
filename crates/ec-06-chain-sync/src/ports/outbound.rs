//! # Outbound Ports

use async_trait::async_trait;
use shared_types::{Block, Hash};

/// Ledger access for backfill - outbound port.
#[async_trait]
pub trait SyncLedger: Send + Sync {
    /// Current best height (0 when only genesis is present).
    fn height(&self) -> u64;

    /// Hash of our best-chain block at `height`.
    fn hash_at_height(&self, height: u64) -> Option<Hash>;

    /// Whether the block is stored, on the best chain or a side branch.
    fn contains_block(&self, hash: &Hash) -> bool;

    /// Validate and append. `Err(reason)` on rejection.
    async fn apply_block(&self, block: Block) -> Result<(), String>;
}
