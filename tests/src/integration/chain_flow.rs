//! # Chain Flow
//!
//! Miner proof-of-work feeding the ledger directly: a block sealed by
//! `ProofOfWork` on top of genesis must be accepted and then be reachable
//! by hash, by height and through the tip.

#[cfg(test)]
mod tests {
    use ec_02_ledger::test_utils::{child_of, seeded_ledger, transfer, TEST_NOW};
    use ec_02_ledger::{AddBlockOutcome, LedgerConfig, LedgerError, ValidationError};
    use ec_04_miner::{assemble_draft, ProofOfWork, SearchOutcome};
    use shared_bus::{EventFilter, EventTopic, NodeEvent};
    use shared_types::{leading_zero_nibbles, Block};
    use tokio_util::sync::CancellationToken;

    fn difficulty_two() -> LedgerConfig {
        LedgerConfig {
            difficulty: 2,
            min_difficulty: 2,
            ..LedgerConfig::default()
        }
    }

    fn seal(parent: &Block, pending: Vec<shared_types::Transaction>, difficulty: u32) -> Block {
        let draft = assemble_draft(parent, pending, "miner", 50, difficulty, TEST_NOW);
        match ProofOfWork::search(draft, u64::MAX, &CancellationToken::new()) {
            SearchOutcome::Found(block) => block,
            other => panic!("search failed: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mined_block_on_genesis_is_retrievable() {
        let (ledger, bus, genesis) = seeded_ledger(difficulty_two()).await;
        let mut chain_events = bus.subscribe(EventFilter::topics(vec![EventTopic::Chain]));
        assert_eq!(ledger.get_height(), 0);

        let block = seal(&genesis, Vec::new(), ledger.get_difficulty());
        assert_eq!(block.previous_hash, genesis.hash);
        assert!(leading_zero_nibbles(&block.hash) >= 2);

        let outcome = ledger.add_block(block.clone()).await.unwrap();
        assert_eq!(outcome, AddBlockOutcome::Appended);
        assert_eq!(ledger.get_height(), 1);
        assert_eq!(ledger.get_block(&block.hash), Some(block.clone()));
        assert_eq!(ledger.get_block_by_height(1), Some(block.clone()));
        assert_eq!(ledger.get_last_block(), Some(block.clone()));

        assert_eq!(
            chain_events.recv().await,
            Some(NodeEvent::BlockAdded {
                hash: block.hash,
                height: 1,
                reorg: false,
                connected: Vec::new(),
            })
        );
    }

    #[tokio::test]
    async fn test_block_carrying_transactions_round_trips_through_ledger() {
        let (ledger, _bus, genesis) = seeded_ledger(difficulty_two()).await;
        let pending = vec![
            transfer("alice", "bob", 10, TEST_NOW - 2),
            transfer("bob", "carol", 4, TEST_NOW - 1),
        ];

        let block = seal(&genesis, pending.clone(), 2);
        assert!(block.has_valid_merkle_root());
        ledger.add_block(block.clone()).await.unwrap();

        let stored = ledger.get_block_by_height(1).unwrap();
        assert_eq!(&stored.transactions[..2], &pending[..]);
        assert!(stored.transactions[2].is_coinbase());
    }

    #[tokio::test]
    async fn test_block_below_minimum_difficulty_is_rejected() {
        let (ledger, _bus, genesis) = seeded_ledger(difficulty_two()).await;

        let easy = child_of(&genesis, Vec::new(), 1);
        let err = ledger.add_block(easy).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::DifficultyTooLow {
                difficulty: 1,
                minimum: 2
            })
        ));
        assert_eq!(ledger.get_height(), 0);
    }

    #[tokio::test]
    async fn test_tampered_nonce_is_rejected() {
        let (ledger, _bus, genesis) = seeded_ledger(difficulty_two()).await;

        let mut block = seal(&genesis, Vec::new(), 2);
        block.nonce = block.nonce.wrapping_add(1);
        assert!(ledger.add_block(block).await.is_err());
        assert_eq!(ledger.get_height(), 0);
        assert_eq!(ledger.get_last_block(), Some(genesis));
    }
}
