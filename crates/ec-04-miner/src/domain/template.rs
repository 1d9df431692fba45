//! Block template assembly.

use shared_types::{Block, BlockDraft, Transaction};

/// Build the next draft on top of `parent`.
///
/// The pending transactions keep their order and the reward transaction is
/// appended last. The timestamp never goes backwards relative to the parent,
/// and the reward shares it so consecutive rewards hash differently.
pub fn assemble_draft(
    parent: &Block,
    pending: Vec<Transaction>,
    reward_address: &str,
    reward_amount: u64,
    difficulty: u32,
    now_ms: u64,
) -> BlockDraft {
    let timestamp = now_ms.max(parent.timestamp + 1);
    let mut transactions = pending;
    transactions.push(Transaction::coinbase(reward_address, reward_amount, timestamp));
    BlockDraft::new(
        parent.hash,
        parent.height + 1,
        timestamp,
        transactions,
        difficulty,
    )
}
