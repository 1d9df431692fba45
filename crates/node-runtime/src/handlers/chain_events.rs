//! # Chain Event Handler
//!
//! Follows the ledger and the miner:
//!
//! - `BlockAdded`: drop the transactions of the block, and of every block a
//!   reorg connected with it, from the mempool, whatever the source (miner,
//!   gossip or sync).
//! - `BlockMined`: announce the new block to the gossip fanout.

use std::sync::Arc;

use ec_02_ledger::Ledger;
use ec_03_mempool::Mempool;
use shared_bus::{NodeEvent, Subscription};
use shared_types::{short_hex, Hash};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::container::NodeGossip;

pub struct ChainEventHandler {
    events: Subscription,
    ledger: Arc<Ledger>,
    mempool: Arc<Mempool>,
    gossip: Arc<NodeGossip>,
}

impl ChainEventHandler {
    pub fn new(
        events: Subscription,
        ledger: Arc<Ledger>,
        mempool: Arc<Mempool>,
        gossip: Arc<NodeGossip>,
    ) -> Self {
        Self {
            events,
            ledger,
            mempool,
            gossip,
        }
    }

    /// Run until shutdown is signalled or the bus closes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("[ledger] Chain event handler started");
        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => self.apply(event).await,
                    None => break,
                },
                _ = shutdown.changed() => {
                    info!("[ledger] Shutdown signal received");
                    break;
                }
            }
        }
    }

    async fn apply(&self, event: NodeEvent) {
        match event {
            NodeEvent::BlockAdded {
                hash, connected, ..
            } => {
                for hash in connected.iter().chain(std::iter::once(&hash)) {
                    self.confirm(hash);
                }
            }
            NodeEvent::BlockMined { hash, height, .. } => {
                if let Some(block) = self.ledger.get_block(&hash) {
                    let sent = self.gossip.announce_block(block).await;
                    debug!("[gossip] Announced mined block #{} to {} peer(s)", height, sent);
                }
            }
            _ => {}
        }
    }

    fn confirm(&self, hash: &Hash) {
        let Some(block) = self.ledger.get_block(hash) else {
            return;
        };
        let removed = self.mempool.remove_included(&block);
        if removed > 0 {
            debug!(
                "[mempool] {} transaction(s) confirmed in {}",
                removed,
                short_hex(hash)
            );
        }
    }
}
