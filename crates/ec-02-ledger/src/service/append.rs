//! Block append, including tip replacement by a longer branch.

use super::*;
use crate::domain::validation::{validate_block_structure, validate_linkage};
use crate::domain::AddBlockOutcome;
use crate::ports::BatchOperation;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Bincode encoding used for stored blocks.
pub fn encode_block(block: &Block) -> Result<Vec<u8>, StorageError> {
    bincode::serialize(block).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Index `block` as the best-chain block at its height.
fn index_best_chain(batch: &mut Vec<BatchOperation>, block: &Block) {
    batch.push(BatchOperation::put(
        KeyPrefix::height_key(block.height),
        block.hash.to_vec(),
    ));
    for tx in &block.transactions {
        batch.push(BatchOperation::put(
            KeyPrefix::transaction_key(&tx.hash),
            block.hash.to_vec(),
        ));
    }
}

impl Ledger {
    /// Validate and persist a block.
    ///
    /// Fails closed: on any `Err` the store and tip are untouched. On a tip
    /// change `NodeEvent::BlockAdded` is published before the writer lock is
    /// released, so events arrive in chain order.
    pub async fn add_block(&self, block: Block) -> Result<AddBlockOutcome, LedgerError> {
        let _writer = self.writer.lock().await;

        let now = self.time_source.now_millis();
        validate_block_structure(&block, now, &self.config)?;

        if self.store.read().exists(&KeyPrefix::block_key(&block.hash))? {
            debug!("[ledger] Block {} already stored", short_hex(&block.hash));
            return Ok(AddBlockOutcome::AlreadyPresent);
        }

        // Side-branch ancestors of `block` (newest first) and the best-chain
        // height they fork from.
        let (ancestors, fork_height) = if block.height == 0 {
            if let Some(existing) = self.hash_at_height(0)? {
                return Err(ValidationError::GenesisMismatch { existing }.into());
            }
            (Vec::new(), 0)
        } else {
            let parent = self.load_block(&block.previous_hash)?;
            validate_linkage(&block, parent.as_ref(), &self.config)?;
            let (ancestors, fork_height) = self.off_chain_ancestors(&block)?;
            self.check_not_included(&block, &ancestors, fork_height)?;
            (ancestors, fork_height)
        };

        let mut batch = vec![BatchOperation::put(
            KeyPrefix::block_key(&block.hash),
            encode_block(&block)?,
        )];

        let current = *self.tip.read();
        let outcome = match current {
            None => {
                index_best_chain(&mut batch, &block);
                AddBlockOutcome::Appended
            }
            Some(tip) if block.previous_hash == tip.hash => {
                index_best_chain(&mut batch, &block);
                AddBlockOutcome::Appended
            }
            Some(tip) if block.height > tip.height => {
                let depth = self.plan_reorg(&block, &ancestors, fork_height, tip, &mut batch)?;
                AddBlockOutcome::Reorganized { depth }
            }
            Some(_) => AddBlockOutcome::SideBranch,
        };

        if outcome.advanced_tip() {
            batch.push(BatchOperation::put(KeyPrefix::tip_key(), block.hash.to_vec()));
        }

        self.store.write().atomic_batch_write(batch)?;

        match outcome {
            AddBlockOutcome::Appended => {
                info!(
                    "[ledger] Block #{} appended | hash: {} | txs: {}",
                    block.height,
                    short_hex(&block.hash),
                    block.transactions.len()
                );
            }
            AddBlockOutcome::Reorganized { depth } => {
                warn!(
                    "[ledger] Reorg: tip replaced by #{} ({}), {} block(s) dropped",
                    block.height,
                    short_hex(&block.hash),
                    depth
                );
            }
            AddBlockOutcome::SideBranch => {
                debug!(
                    "[ledger] Stored side block #{} ({})",
                    block.height,
                    short_hex(&block.hash)
                );
            }
            AddBlockOutcome::AlreadyPresent => {}
        }

        if outcome.advanced_tip() {
            *self.tip.write() = Some(ChainTip {
                hash: block.hash,
                height: block.height,
            });
            let reorg = matches!(outcome, AddBlockOutcome::Reorganized { .. });
            let connected = if reorg {
                ancestors.iter().rev().map(|b| b.hash).collect()
            } else {
                Vec::new()
            };
            self.events
                .publish(NodeEvent::BlockAdded {
                    hash: block.hash,
                    height: block.height,
                    reorg,
                    connected,
                })
                .await;
        }

        Ok(outcome)
    }

    /// Walk back from `block`'s parent to the best chain.
    ///
    /// Returns the stored ancestors that are not on the best chain, newest
    /// first, and the height of the best-chain block they fork from. Both
    /// are empty/the parent height when the parent is on the best chain.
    fn off_chain_ancestors(&self, block: &Block) -> Result<(Vec<Block>, u64), LedgerError> {
        let mut ancestors = Vec::new();
        let mut cursor = block.previous_hash;
        let mut fork_height = block.height - 1;

        while self.hash_at_height(fork_height)? != Some(cursor) {
            if fork_height == 0 {
                return Err(StorageError::DataCorruption(
                    "side branch does not reach the stored genesis".into(),
                )
                .into());
            }
            let ancestor = self.load_block(&cursor)?.ok_or_else(|| {
                StorageError::DataCorruption(format!("missing ancestor {}", short_hex(&cursor)))
            })?;
            cursor = ancestor.previous_hash;
            ancestors.push(ancestor);
            fork_height -= 1;
        }

        Ok((ancestors, fork_height))
    }

    /// A non-coinbase transaction may appear once on a chain.
    ///
    /// Rejects `block` if it repeats a transaction, or carries one already
    /// in its side-branch `ancestors` or in a best-chain block at or below
    /// `fork_height`.
    fn check_not_included(
        &self,
        block: &Block,
        ancestors: &[Block],
        fork_height: u64,
    ) -> Result<(), LedgerError> {
        let mut seen: HashSet<Hash> = ancestors
            .iter()
            .flat_map(|b| b.transactions.iter())
            .filter(|tx| !tx.is_coinbase())
            .map(|tx| tx.hash)
            .collect();

        for tx in block.transactions.iter().filter(|tx| !tx.is_coinbase()) {
            if !seen.insert(tx.hash) {
                return Err(ValidationError::AlreadyIncluded { hash: tx.hash }.into());
            }
            let Some(container) = self.indexed_transaction(&tx.hash)? else {
                continue;
            };
            let below_fork = self
                .load_block(&container)?
                .is_some_and(|b| b.height <= fork_height);
            if below_fork {
                return Err(ValidationError::AlreadyIncluded { hash: tx.hash }.into());
            }
        }
        Ok(())
    }

    /// Queue the index rewrite that makes `block`'s branch the best chain.
    ///
    /// Un-indexes the transactions of the best-chain blocks above
    /// `fork_height`, then indexes `ancestors` and `block`. Returns how many
    /// best-chain blocks were dropped.
    fn plan_reorg(
        &self,
        block: &Block,
        ancestors: &[Block],
        fork_height: u64,
        tip: ChainTip,
        batch: &mut Vec<BatchOperation>,
    ) -> Result<u64, LedgerError> {
        for height in (fork_height + 1)..=tip.height {
            if let Some(dropped) = self.block_at_height(height)? {
                for tx in &dropped.transactions {
                    batch.push(BatchOperation::delete(KeyPrefix::transaction_key(&tx.hash)));
                }
            }
        }

        // The new branch is strictly longer, so every dropped height key is
        // overwritten here.
        for member in ancestors.iter().rev().chain(std::iter::once(block)) {
            index_best_chain(batch, member);
        }

        Ok(tip.height - fork_height)
    }
}
