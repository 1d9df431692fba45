//! Nonce search.

use sha2::Digest;
use shared_types::{meets_difficulty, Block, BlockDraft, Hash};
use tokio_util::sync::CancellationToken;

/// Result of one search over a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A nonce meeting the target was found.
    Found(Block),
    /// Every nonce up to `max_nonce` failed.
    Exhausted { attempts: u64 },
    /// The token fired before a solution was found.
    Cancelled,
}

/// Sequential CPU proof-of-work.
pub struct ProofOfWork;

impl ProofOfWork {
    /// Try nonces `0..=max_nonce` in order.
    ///
    /// Blocking; run it on `spawn_blocking`. The token is checked before
    /// every attempt.
    pub fn search(draft: BlockDraft, max_nonce: u64, cancel: &CancellationToken) -> SearchOutcome {
        let prefix = draft.header_hasher();
        for nonce in 0..=max_nonce {
            if cancel.is_cancelled() {
                return SearchOutcome::Cancelled;
            }
            let mut hasher = prefix.clone();
            hasher.update(nonce.to_le_bytes());
            let hash: Hash = hasher.finalize().into();
            if meets_difficulty(&hash, draft.difficulty) {
                return SearchOutcome::Found(draft.seal(nonce));
            }
        }
        SearchOutcome::Exhausted {
            attempts: max_nonce.saturating_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::{Transaction, ZERO_HASH};

    fn draft(difficulty: u32) -> BlockDraft {
        BlockDraft::new(
            ZERO_HASH,
            1,
            1_700_000_000_000,
            vec![Transaction::coinbase("miner", 50, 1_700_000_000_000)],
            difficulty,
        )
    }

    #[test]
    fn test_found_block_meets_target() {
        let outcome = ProofOfWork::search(draft(2), u64::MAX, &CancellationToken::new());
        let SearchOutcome::Found(block) = outcome else {
            panic!("expected a solution");
        };
        assert!(block.has_valid_hash());
        assert!(block.meets_difficulty());
        assert!(block.has_valid_merkle_root());
    }

    #[test]
    fn test_search_matches_draft_hashing() {
        let d = draft(1);
        let SearchOutcome::Found(block) = ProofOfWork::search(d.clone(), u64::MAX, &CancellationToken::new())
        else {
            panic!("expected a solution");
        };
        assert_eq!(block.hash, d.hash_with_nonce(block.nonce));
    }

    #[test]
    fn test_exhausted_when_target_unreachable() {
        let outcome = ProofOfWork::search(draft(64), 99, &CancellationToken::new());
        assert_eq!(outcome, SearchOutcome::Exhausted { attempts: 100 });
    }

    #[test]
    fn test_cancelled_before_first_attempt() {
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(
            ProofOfWork::search(draft(1), u64::MAX, &token),
            SearchOutcome::Cancelled
        );
    }

    proptest! {
        #[test]
        fn test_search_returns_lowest_winning_nonce(ts in 1u64..u64::MAX / 2, reward in 1u64..1_000) {
            let d = BlockDraft::new(
                ZERO_HASH,
                1,
                ts,
                vec![Transaction::coinbase("miner", reward, ts)],
                1,
            );
            let SearchOutcome::Found(block) = ProofOfWork::search(d.clone(), u64::MAX, &CancellationToken::new())
            else {
                panic!("expected a solution");
            };
            for nonce in 0..block.nonce {
                prop_assert!(!meets_difficulty(&d.hash_with_nonce(nonce), 1));
            }
        }
    }
}
