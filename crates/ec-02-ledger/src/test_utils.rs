//! Block builders for tests.
//!
//! Enabled for this crate's own tests and, through the `test-utils`
//! feature, for downstream test suites.

use crate::adapters::{AcceptAllSignatures, InMemoryKVStore};
use crate::domain::LedgerConfig;
use crate::service::{Ledger, LedgerDependencies};
use shared_bus::InMemoryEventBus;
use shared_types::{Block, BlockDraft, FixedTimeSource, Transaction, ZERO_HASH};
use std::sync::Arc;

/// Timestamp of the test genesis block.
pub const TEST_GENESIS_TIMESTAMP: u64 = 1_700_000_000_000;

/// Clock used by `test_ledger`: one day after the test genesis.
pub const TEST_NOW: u64 = TEST_GENESIS_TIMESTAMP + 24 * shared_types::HOUR_MS;

/// Brute-force a nonce for `draft`.
pub fn mine(draft: BlockDraft) -> Block {
    let nonce = (0..u64::MAX)
        .find(|n| shared_types::meets_difficulty(&draft.hash_with_nonce(*n), draft.difficulty))
        .unwrap_or(0);
    draft.seal(nonce)
}

/// Deterministic difficulty-0 genesis with no transactions.
pub fn genesis_block() -> Block {
    BlockDraft::new(ZERO_HASH, 0, TEST_GENESIS_TIMESTAMP, Vec::new(), 0).seal(0)
}

/// Mine a child of `parent` one second later.
pub fn child_of(parent: &Block, transactions: Vec<Transaction>, difficulty: u32) -> Block {
    child_at(parent, transactions, difficulty, parent.timestamp + 1_000)
}

/// Mine a child of `parent` with an explicit timestamp (to fork deterministically).
pub fn child_at(
    parent: &Block,
    transactions: Vec<Transaction>,
    difficulty: u32,
    timestamp: u64,
) -> Block {
    mine(BlockDraft::new(
        parent.hash,
        parent.height + 1,
        timestamp,
        transactions,
        difficulty,
    ))
}

/// Mine `count` empty blocks on top of `parent`.
pub fn chain_from(parent: &Block, count: usize, difficulty: u32) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::with_capacity(count);
    for _ in 0..count {
        let next = child_of(blocks.last().unwrap_or(parent), Vec::new(), difficulty);
        blocks.push(next);
    }
    blocks
}

/// Unsigned transfer; pair with `AcceptAllSignatures`.
pub fn transfer(from: &str, to: &str, amount: u64, timestamp: u64) -> Transaction {
    Transaction::new(from, to, amount, timestamp, vec![0xEE; 64])
}

/// In-memory ledger on a fixed clock, with its event bus.
pub fn test_ledger(config: LedgerConfig) -> (Arc<Ledger>, Arc<InMemoryEventBus>) {
    let bus = Arc::new(InMemoryEventBus::new());
    let ledger = Ledger::new(
        LedgerDependencies {
            store: Box::new(InMemoryKVStore::new()),
            verifier: Arc::new(AcceptAllSignatures),
            events: bus.clone(),
            time_source: Arc::new(FixedTimeSource(TEST_NOW)),
        },
        config,
    );
    (Arc::new(ledger), bus)
}

/// `test_ledger` seeded with `genesis_block()`.
pub async fn seeded_ledger(config: LedgerConfig) -> (Arc<Ledger>, Arc<InMemoryEventBus>, Block) {
    let (ledger, bus) = test_ledger(config);
    let genesis = genesis_block();
    // Seeding an empty in-memory ledger cannot fail.
    let _ = ledger.seed_genesis(genesis.clone()).await;
    (ledger, bus, genesis)
}
