//! # Mempool Adapter
//!
//! Exposes the shared `Mempool` to the miner (`TransactionSource`) and to
//! gossip (`MempoolGateway`).

use std::sync::Arc;

use async_trait::async_trait;
use ec_03_mempool::{Mempool, MempoolError};
use ec_04_miner::TransactionSource;
use ec_05_gossip::{MempoolGateway, TxAdmission};
use shared_types::{Block, Hash, Transaction};

#[derive(Clone)]
pub struct MempoolAdapter {
    mempool: Arc<Mempool>,
}

impl MempoolAdapter {
    pub fn new(mempool: Arc<Mempool>) -> Self {
        Self { mempool }
    }
}

impl TransactionSource for MempoolAdapter {
    fn pending_transactions(&self) -> Vec<Transaction> {
        self.mempool.get_pending_transactions()
    }

    fn remove_included(&self, block: &Block) {
        self.mempool.remove_included(block);
    }
}

#[async_trait]
impl MempoolGateway for MempoolAdapter {
    fn pending_transactions(&self) -> Vec<Transaction> {
        self.mempool.get_pending_transactions()
    }

    fn contains(&self, hash: &Hash) -> bool {
        self.mempool.contains(hash)
    }

    async fn admit(&self, transaction: Transaction) -> TxAdmission {
        match self.mempool.add_transaction(transaction).await {
            Ok(_) => TxAdmission::Admitted,
            Err(MempoolError::DuplicateTransaction(_)) => TxAdmission::Known,
            Err(e) => TxAdmission::Rejected(e.to_string()),
        }
    }

    fn remove_included(&self, block: &Block) -> usize {
        self.mempool.remove_included(block)
    }
}
