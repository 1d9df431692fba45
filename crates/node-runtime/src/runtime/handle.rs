//! Control-plane handle.
//!
//! A cheap, cloneable view of one node for an API layer: chain and mempool
//! reads, transaction submission and mining control.

use std::ops::RangeInclusive;
use std::sync::Arc;

use ec_01_peer_routing::{RoutingApi, RoutingService};
use ec_02_ledger::{ChainTip, Ledger};
use ec_03_mempool::{Mempool, MempoolError, MempoolStatus};
use ec_04_miner::{Miner, MinerState};
use ec_06_chain_sync::{SyncApi, SyncOutcome};
use shared_types::{Block, Hash, NodeId, PeerInfo, Transaction};
use tracing::debug;

use crate::container::{NodeGossip, NodeServices, NodeSync};

#[derive(Clone)]
pub struct NodeHandle {
    node_id: NodeId,
    ledger: Arc<Ledger>,
    mempool: Arc<Mempool>,
    miner: Arc<Miner>,
    gossip: Arc<NodeGossip>,
    sync: Arc<NodeSync>,
    routing: Arc<RoutingService>,
}

impl NodeHandle {
    pub(crate) fn new(node_id: NodeId, services: &NodeServices) -> Self {
        Self {
            node_id,
            ledger: Arc::clone(&services.ledger),
            mempool: Arc::clone(&services.mempool),
            miner: Arc::clone(&services.miner),
            gossip: Arc::clone(&services.gossip),
            sync: Arc::clone(&services.sync),
            routing: Arc::clone(&services.routing),
        }
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    // =========================================================================
    // CHAIN
    // =========================================================================

    pub fn height(&self) -> u64 {
        self.ledger.get_height()
    }

    /// Difficulty the next block must meet.
    pub fn difficulty(&self) -> u32 {
        self.ledger.get_difficulty()
    }

    pub fn tip(&self) -> Option<ChainTip> {
        self.ledger.tip()
    }

    pub fn block_by_hash(&self, hash: &Hash) -> Option<Block> {
        self.ledger.get_block(hash)
    }

    pub fn block_by_height(&self, height: u64) -> Option<Block> {
        self.ledger.get_block_by_height(height)
    }

    /// Best-chain blocks in `range`, capped at `MAX_BLOCKS_PER_QUERY`.
    pub fn blocks(&self, range: RangeInclusive<u64>) -> Vec<Block> {
        self.ledger.get_blocks(range)
    }

    pub fn last_block(&self) -> Option<Block> {
        self.ledger.get_last_block()
    }

    // =========================================================================
    // MEMPOOL
    // =========================================================================

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.mempool.get_pending_transactions()
    }

    pub fn mempool_status(&self) -> MempoolStatus {
        self.mempool.status()
    }

    /// Admit `tx` locally, then push it to every peer.
    pub async fn submit_transaction(&self, tx: Transaction) -> Result<Hash, MempoolError> {
        let hash = self.mempool.add_transaction(tx.clone()).await?;
        let sent = self.gossip.broadcast_transaction(tx).await;
        debug!("[gossip] Submitted transaction broadcast to {} peer(s)", sent);
        Ok(hash)
    }

    // =========================================================================
    // NETWORK
    // =========================================================================

    /// Peers in the routing table.
    pub fn peers(&self) -> Vec<PeerInfo> {
        self.routing
            .all_nodes()
            .into_iter()
            .map(|entry| entry.info)
            .collect()
    }

    /// Run one sync cycle now (skipped if one is already running).
    pub async fn sync_now(&self) -> SyncOutcome {
        self.sync.sync_once().await
    }

    // =========================================================================
    // MINING
    // =========================================================================

    /// Returns `false` if already mining.
    pub async fn start_mining(&self) -> bool {
        self.miner.start().await
    }

    /// Returns `false` if not mining.
    pub async fn stop_mining(&self) -> bool {
        self.miner.stop().await
    }

    pub fn is_mining(&self) -> bool {
        self.miner.is_mining()
    }

    pub fn miner_state(&self) -> MinerState {
        self.miner.state()
    }

    pub fn blocks_mined(&self) -> u64 {
        self.miner.blocks_mined()
    }
}
