//! # Gossip Service
//!
//! Epidemic push of pending transactions and the chain tip, plus the
//! inbound path that admits, appends and relays what peers push to us.
//!
//! Every send is bounded by `send_timeout`. A failed send is logged and
//! counted; nothing here returns a delivery error to the caller.

use crate::domain::{select_targets, GossipConfig, GossipError, GossipRound, GossipStats, SeenCache};
use crate::ports::{BlockImport, ChainGateway, MempoolGateway, TxAdmission};
use parking_lot::RwLock;
use shared_types::{short_hex, Block, NetworkMessage, PeerId, PeerTransport, Transaction};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What happened to a message a peer pushed to us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// Accepted locally and relayed to `relayed` peers.
    Accepted { relayed: usize },
    /// Already known; dropped without relay.
    Ignored,
    /// Failed validation; dropped without relay.
    Rejected(String),
}

/// Gossip manager.
///
/// Shared across tasks via `Arc`; `run` drives the periodic round.
pub struct GossipService<T, L, M>
where
    T: PeerTransport + ?Sized,
    L: ChainGateway + ?Sized,
    M: MempoolGateway + ?Sized,
{
    config: GossipConfig,
    transport: Arc<T>,
    ledger: Arc<L>,
    mempool: Arc<M>,
    seen: SeenCache,
    stats: RwLock<GossipStats>,
}

impl<T, L, M> GossipService<T, L, M>
where
    T: PeerTransport + ?Sized,
    L: ChainGateway + ?Sized,
    M: MempoolGateway + ?Sized,
{
    pub fn new(config: GossipConfig, transport: Arc<T>, ledger: Arc<L>, mempool: Arc<M>) -> Self {
        info!(
            "[gossip] Initializing gossip (interval: {}ms, fanout: {})",
            config.interval_ms, config.fanout
        );
        Self {
            seen: SeenCache::new(config.seen_cache_size),
            config,
            transport,
            ledger,
            mempool,
            stats: RwLock::new(GossipStats::default()),
        }
    }

    pub fn config(&self) -> &GossipConfig {
        &self.config
    }

    pub fn stats(&self) -> GossipStats {
        self.stats.read().clone()
    }

    /// Run push rounds every `interval` until `shutdown` fires.
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.interval());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so the node can settle.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("[gossip] Gossip loop stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.gossip_round().await;
                }
            }
        }
    }

    /// One push round: the pending snapshot and the tip to `fanout` random peers.
    pub async fn gossip_round(&self) -> GossipRound {
        self.stats.write().rounds += 1;

        let targets = self.pick_targets(self.transport.peers().await, None);
        if targets.is_empty() {
            debug!("[gossip] No peers to gossip to");
            return GossipRound::default();
        }

        let mut messages: Vec<NetworkMessage> = self
            .mempool
            .pending_transactions()
            .into_iter()
            .map(|transaction| NetworkMessage::NewTransaction { transaction })
            .collect();
        if let Some(block) = self.ledger.last_block() {
            messages.push(NetworkMessage::NewBlock { block });
        }

        let mut round = GossipRound {
            targets: targets.len(),
            ..Default::default()
        };
        for peer in &targets {
            for message in &messages {
                match self.send_bounded(peer, message.clone()).await {
                    Ok(()) => round.sent += 1,
                    Err(_) => {
                        round.failed += 1;
                        // One failure is enough to skip the rest for this peer.
                        break;
                    }
                }
            }
        }

        debug!(
            "[gossip] Round complete | peers: {} | sent: {} | failed: {}",
            round.targets, round.sent, round.failed
        );
        round
    }

    /// Handle a transaction pushed by `from`.
    pub async fn handle_transaction(&self, from: &PeerId, transaction: Transaction) -> InboundOutcome {
        let hash = transaction.hash;
        if self.seen.contains(&hash) || self.mempool.contains(&hash) {
            return InboundOutcome::Ignored;
        }

        match self.mempool.admit(transaction.clone()).await {
            TxAdmission::Admitted => {}
            TxAdmission::Known => {
                self.seen.insert(hash);
                return InboundOutcome::Ignored;
            }
            TxAdmission::Rejected(reason) => {
                debug!("[gossip] Dropped tx {} from {}: {}", short_hex(&hash), from, reason);
                self.stats.write().rejected += 1;
                return InboundOutcome::Rejected(reason);
            }
        }

        self.seen.insert(hash);
        self.stats.write().transactions_accepted += 1;
        let relayed = self
            .relay(NetworkMessage::NewTransaction { transaction }, Some(from))
            .await;
        debug!(
            "[gossip] Accepted tx {} from {}, relayed to {} peer(s)",
            short_hex(&hash),
            from,
            relayed
        );
        InboundOutcome::Accepted { relayed }
    }

    /// Handle a block pushed by `from`.
    pub async fn handle_block(&self, from: &PeerId, block: Block) -> InboundOutcome {
        let hash = block.hash;
        if self.seen.contains(&hash) || self.ledger.contains_block(&hash) {
            return InboundOutcome::Ignored;
        }

        match self.ledger.import_block(block.clone()).await {
            BlockImport::Extended => {
                let removed = self.mempool.remove_included(&block);
                info!(
                    "[gossip] Block #{} from {} accepted | hash: {} | cleared {} pending tx(s)",
                    block.height,
                    from,
                    short_hex(&hash),
                    removed
                );
            }
            BlockImport::Stored => {
                debug!(
                    "[gossip] Block #{} from {} stored on a side branch",
                    block.height, from
                );
            }
            BlockImport::Known => {
                self.seen.insert(hash);
                return InboundOutcome::Ignored;
            }
            BlockImport::Rejected(reason) => {
                debug!(
                    "[gossip] Dropped block {} from {}: {}",
                    short_hex(&hash),
                    from,
                    reason
                );
                self.stats.write().rejected += 1;
                return InboundOutcome::Rejected(reason);
            }
        }

        self.seen.insert(hash);
        self.stats.write().blocks_accepted += 1;
        let relayed = self.relay(NetworkMessage::NewBlock { block }, Some(from)).await;
        InboundOutcome::Accepted { relayed }
    }

    /// Push a locally submitted transaction to every connected peer.
    pub async fn broadcast_transaction(&self, transaction: Transaction) -> usize {
        self.seen.insert(transaction.hash);
        let message = NetworkMessage::NewTransaction { transaction };
        let mut delivered = 0;
        for peer in self.transport.peers().await {
            if self.send_bounded(&peer, message.clone()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Push a freshly mined block to `fanout` random peers.
    pub async fn announce_block(&self, block: Block) -> usize {
        self.seen.insert(block.hash);
        self.relay(NetworkMessage::NewBlock { block }, None).await
    }

    async fn relay(&self, message: NetworkMessage, exclude: Option<&PeerId>) -> usize {
        let targets = self.pick_targets(self.transport.peers().await, exclude);
        let mut delivered = 0;
        for peer in &targets {
            if self.send_bounded(peer, message.clone()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    fn pick_targets(&self, peers: Vec<PeerId>, exclude: Option<&PeerId>) -> Vec<PeerId> {
        select_targets(&peers, self.config.fanout, exclude, &mut rand::thread_rng())
    }

    async fn send_bounded(&self, peer: &PeerId, message: NetworkMessage) -> Result<(), GossipError> {
        let kind = message.kind();
        let result = match tokio::time::timeout(
            self.config.send_timeout(),
            self.transport.send(peer, message),
        )
        .await
        {
            Ok(sent) => sent.map_err(GossipError::from),
            Err(_) => Err(GossipError::Timeout {
                peer: *peer,
                timeout_ms: self.config.send_timeout_ms,
            }),
        };

        let mut stats = self.stats.write();
        match &result {
            Ok(()) => stats.messages_sent += 1,
            Err(e) => {
                stats.send_failures += 1;
                warn!("[gossip] Failed to send {} to {}: {}", kind, peer, e);
            }
        }
        result
    }
}
