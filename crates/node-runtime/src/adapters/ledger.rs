//! # Ledger Adapter
//!
//! One wrapper around the shared `Ledger` that implements the outbound port
//! each consumer declares for it:
//!
//! | Port | Consumer |
//! |------|----------|
//! | `TransactionValidator` | mempool admission |
//! | `BlockSubmitter` | miner |
//! | `ChainGateway` | gossip |
//! | `SyncLedger` | chain sync |

use std::sync::Arc;

use async_trait::async_trait;
use ec_02_ledger::{AddBlockOutcome, Ledger, LedgerError};
use ec_03_mempool::TransactionValidator;
use ec_04_miner::{BlockSubmitter, SubmitOutcome};
use ec_05_gossip::{BlockImport, ChainGateway};
use ec_06_chain_sync::SyncLedger;
use shared_types::{short_hex, Block, Hash, Transaction};
use tracing::warn;

/// Shares one ledger among the mempool, miner, gossip and sync services.
#[derive(Clone)]
pub struct LedgerAdapter {
    ledger: Arc<Ledger>,
}

impl LedgerAdapter {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Turn a rejection into the port's reason string. Storage failures are
    /// not the block's fault, so they are also logged here.
    fn reason(hash: &Hash, err: LedgerError) -> String {
        if !err.is_recoverable() {
            warn!("[ledger] Failed to add {}: {}", short_hex(hash), err);
        }
        err.to_string()
    }
}

impl TransactionValidator for LedgerAdapter {
    fn validate(&self, tx: &Transaction) -> Result<(), String> {
        self.ledger
            .validate_transaction(tx)
            .map_err(|e| e.to_string())
    }

    fn is_included(&self, hash: &Hash) -> bool {
        self.ledger.containing_block(hash).is_some()
    }
}

#[async_trait]
impl BlockSubmitter for LedgerAdapter {
    fn last_block(&self) -> Option<Block> {
        self.ledger.get_last_block()
    }

    fn difficulty(&self) -> u32 {
        self.ledger.get_difficulty()
    }

    async fn submit_block(&self, block: Block) -> Result<SubmitOutcome, String> {
        let hash = block.hash;
        match self.ledger.add_block(block).await {
            Ok(outcome) if outcome.advanced_tip() => Ok(SubmitOutcome::Accepted),
            Ok(_) => Ok(SubmitOutcome::Stale),
            Err(e) => Err(Self::reason(&hash, e)),
        }
    }
}

#[async_trait]
impl ChainGateway for LedgerAdapter {
    fn last_block(&self) -> Option<Block> {
        self.ledger.get_last_block()
    }

    fn contains_block(&self, hash: &Hash) -> bool {
        self.ledger.contains_block(hash)
    }

    async fn import_block(&self, block: Block) -> BlockImport {
        let hash = block.hash;
        match self.ledger.add_block(block).await {
            Ok(AddBlockOutcome::Appended) | Ok(AddBlockOutcome::Reorganized { .. }) => {
                BlockImport::Extended
            }
            Ok(AddBlockOutcome::SideBranch) => BlockImport::Stored,
            Ok(AddBlockOutcome::AlreadyPresent) => BlockImport::Known,
            Err(e) => BlockImport::Rejected(Self::reason(&hash, e)),
        }
    }
}

#[async_trait]
impl SyncLedger for LedgerAdapter {
    fn height(&self) -> u64 {
        self.ledger.get_height()
    }

    fn hash_at_height(&self, height: u64) -> Option<Hash> {
        self.ledger.get_block_by_height(height).map(|b| b.hash)
    }

    fn contains_block(&self, hash: &Hash) -> bool {
        self.ledger.contains_block(hash)
    }

    async fn apply_block(&self, block: Block) -> Result<(), String> {
        let hash = block.hash;
        self.ledger
            .add_block(block)
            .await
            .map(|_| ())
            .map_err(|e| Self::reason(&hash, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_02_ledger::test_utils::{child_at, child_of, seeded_ledger, transfer, TEST_NOW};
    use ec_02_ledger::LedgerConfig;

    async fn adapter() -> (LedgerAdapter, Block) {
        let (ledger, _bus, genesis) = seeded_ledger(LedgerConfig::for_testing()).await;
        (LedgerAdapter::new(ledger), genesis)
    }

    #[tokio::test]
    async fn test_submit_maps_outcomes() {
        let (adapter, genesis) = adapter().await;
        let block = child_of(&genesis, vec![], 1);

        assert_eq!(
            adapter.submit_block(block.clone()).await,
            Ok(SubmitOutcome::Accepted)
        );
        // Same block again: valid but changes nothing.
        assert_eq!(adapter.submit_block(block).await, Ok(SubmitOutcome::Stale));

        let mut bad = child_of(&genesis, vec![], 1);
        bad.nonce = bad.nonce.wrapping_add(1);
        assert!(adapter.submit_block(bad).await.is_err());
    }

    #[tokio::test]
    async fn test_import_maps_outcomes() {
        let (adapter, genesis) = adapter().await;
        let tip = child_of(&genesis, vec![], 1);
        let sibling = child_at(&genesis, vec![], 1, genesis.timestamp + 5_000);

        assert_eq!(adapter.import_block(tip.clone()).await, BlockImport::Extended);
        assert_eq!(adapter.import_block(tip).await, BlockImport::Known);
        assert_eq!(adapter.import_block(sibling).await, BlockImport::Stored);

        let mut tampered = child_of(&genesis, vec![], 1);
        tampered.timestamp += 1;
        assert!(matches!(
            adapter.import_block(tampered).await,
            BlockImport::Rejected(_)
        ));
    }

    #[tokio::test]
    async fn test_sync_view_tracks_best_chain() {
        let (adapter, genesis) = adapter().await;
        assert_eq!(SyncLedger::height(&adapter), 0);
        assert_eq!(adapter.hash_at_height(0), Some(genesis.hash));

        let block = child_of(&genesis, vec![], 1);
        adapter.apply_block(block.clone()).await.unwrap();
        assert_eq!(SyncLedger::height(&adapter), 1);
        assert_eq!(adapter.hash_at_height(1), Some(block.hash));
        assert_eq!(adapter.hash_at_height(2), None);

        let sibling = child_at(&genesis, vec![], 1, genesis.timestamp + 5_000);
        assert!(!SyncLedger::contains_block(&adapter, &sibling.hash));
        adapter.apply_block(sibling.clone()).await.unwrap();
        assert!(SyncLedger::contains_block(&adapter, &sibling.hash));
        assert_eq!(adapter.hash_at_height(1), Some(block.hash));
    }

    #[tokio::test]
    async fn test_validator_delegates_to_ledger() {
        let (adapter, _genesis) = adapter().await;
        let tx = transfer("alice", "bob", 5, TEST_NOW);
        assert!(adapter.validate(&tx).is_ok());

        let mut forged = tx;
        forged.amount = 500;
        assert!(adapter.validate(&forged).is_err());
    }
}
