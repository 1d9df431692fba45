//! # Chain Sync Service
//!
//! One cycle:
//!
//! 1. Read the local height.
//! 2. Ask every peer for its height (each request timeout-bounded).
//! 3. Fetch `local+1 ..= max` in ascending order from any peer that has it,
//!    checking each block links to our block below it, and append.
//!
//! When a fetched block does not link to our block below it, the peer is on
//! a competing branch. The service then asks that same peer for lower heights
//! until it reaches a block whose parent we store, and hands the branch to
//! the ledger oldest first so the longer chain wins by reorganization.
//!
//! A height nobody serves, an unresolved fork or a ledger rejection ends the
//! cycle early; the next cycle starts over from the new local height.

use async_trait::async_trait;
use shared_bus::{EventPublisher, NodeEvent};
use shared_types::{Block, NetworkMessage, PeerId, PeerTransport};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::domain::{
    candidates_for, check_linkage, target_height, PeerHeight, SyncError, SyncOutcome, SyncReport,
    SyncStats,
};
use crate::ports::{SyncApi, SyncLedger};

/// Chain Sync Service - height-driven backfill.
pub struct ChainSyncService<T, L>
where
    T: PeerTransport + ?Sized,
    L: SyncLedger + ?Sized,
{
    config: SyncConfig,
    transport: Arc<T>,
    ledger: Arc<L>,
    events: Arc<dyn EventPublisher>,
    in_flight: AtomicBool,
    cycles: AtomicU64,
    skipped: AtomicU64,
    timed_out: AtomicU64,
    blocks_applied: AtomicU64,
}

/// Clears the single-flight flag when a cycle ends, including on timeout.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T, L> ChainSyncService<T, L>
where
    T: PeerTransport + ?Sized,
    L: SyncLedger + ?Sized,
{
    /// Create a new sync service.
    pub fn new(
        config: SyncConfig,
        transport: Arc<T>,
        ledger: Arc<L>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            transport,
            ledger,
            events,
            in_flight: AtomicBool::new(false),
            cycles: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            timed_out: AtomicU64::new(0),
            blocks_applied: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Sync at startup, then every `interval`, until `shutdown` fires.
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.interval());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("[sync] Sync loop stopped");
                    return;
                }
                _ = ticker.tick() => {
                    let outcome = tokio::select! {
                        _ = shutdown.cancelled() => {
                            info!("[sync] Sync loop stopped mid-cycle");
                            return;
                        }
                        outcome = self.sync_once() => outcome,
                    };
                    if let SyncOutcome::TimedOut(report) = outcome {
                        warn!(
                            "[sync] Cycle timed out after applying {} block(s)",
                            report.applied
                        );
                    }
                }
            }
        }
    }

    async fn run_cycle(&self, report: &mut SyncReport) {
        report.local_height = self.ledger.height();
        let peers = self.query_heights().await;
        report.peers_responded = peers.len();
        report.target_height = target_height(report.local_height, &peers);

        if report.target_height <= report.local_height {
            debug!(
                "[sync] Up to date at height {} ({} peer(s) answered)",
                report.local_height,
                peers.len()
            );
            return;
        }

        info!(
            "[sync] Behind: local {} < network {}, fetching {} block(s)",
            report.local_height,
            report.target_height,
            report.target_height - report.local_height
        );

        let mut height = report.local_height + 1;
        while height <= report.target_height {
            let Some((source, block)) = self.fetch_block(height, &peers).await else {
                info!("[sync] No peer served height {}, stopping at gap", height);
                return;
            };

            let segment = match self.segment_for(source, block, height).await {
                Ok(segment) => segment,
                Err(e) => {
                    warn!("[sync] Stopping at height {}: {}", height, e);
                    return;
                }
            };
            for block in segment {
                let at = block.height;
                if let Err(reason) = self.ledger.apply_block(block).await {
                    warn!(
                        "[sync] Stopping at height {}: {}",
                        at,
                        SyncError::Rejected { height: at, reason }
                    );
                    return;
                }
                report.applied += 1;
                self.blocks_applied.fetch_add(1, Ordering::Relaxed);
            }
            height += 1;
        }
    }

    /// Blocks to apply so that `block` lands at `height`, oldest first.
    ///
    /// Just `block` when it builds on our block below it. Otherwise the
    /// branch walked back from `source` to a block we store.
    async fn segment_for(
        &self,
        source: PeerId,
        block: Block,
        height: u64,
    ) -> Result<Vec<Block>, SyncError> {
        let parent = self.ledger.hash_at_height(height - 1);
        match check_linkage(&block, height, parent) {
            Ok(()) => Ok(vec![block]),
            Err(e @ SyncError::Disconnected { .. }) => {
                debug!("[sync] {}, tracing the branch back through {}", e, source);
                self.trace_branch(source, block).await
            }
            Err(e) => Err(e),
        }
    }

    async fn trace_branch(&self, source: PeerId, tip: Block) -> Result<Vec<Block>, SyncError> {
        let limit = self.config.max_fork_depth;
        let mut branch = vec![tip];
        loop {
            let (lowest_height, wanted) = match branch.last() {
                Some(lowest) => (lowest.height, lowest.previous_hash),
                None => return Ok(branch),
            };
            if self.ledger.contains_block(&wanted) {
                break;
            }
            if lowest_height <= 1 {
                return Err(SyncError::ForeignChain { peer: source });
            }
            if branch.len() as u64 >= limit {
                return Err(SyncError::ForkTooDeep {
                    height: lowest_height,
                    limit,
                });
            }

            let below = lowest_height - 1;
            match self.request_block(&source, below).await? {
                Some(parent) if parent.hash == wanted && parent.height == below => {
                    branch.push(parent)
                }
                _ => {
                    return Err(SyncError::BrokenBranch {
                        peer: source,
                        height: lowest_height,
                    })
                }
            }
        }

        branch.reverse();
        info!(
            "[sync] Switching to the branch from {}: {} block(s) from height {}",
            source,
            branch.len(),
            branch.first().map(|b| b.height).unwrap_or_default()
        );
        Ok(branch)
    }

    /// Heights from every peer that answers in time.
    async fn query_heights(&self) -> Vec<PeerHeight> {
        let mut answers = Vec::new();
        for peer in self.transport.peers().await {
            match self.request(&peer, NetworkMessage::HeightRequest).await {
                Ok(NetworkMessage::HeightResponse { height }) => {
                    answers.push(PeerHeight { peer, height });
                }
                Ok(other) => warn!(
                    "[sync] {}",
                    SyncError::UnexpectedResponse {
                        peer,
                        kind: other.kind()
                    }
                ),
                Err(e) => warn!("[sync] Height query to {} failed: {}", peer, e),
            }
        }
        answers
    }

    /// First block at `height` any candidate peer returns, with its source.
    async fn fetch_block(&self, height: u64, peers: &[PeerHeight]) -> Option<(PeerId, Block)> {
        for candidate in candidates_for(height, peers) {
            match self.request_block(&candidate.peer, height).await {
                Ok(Some(block)) => return Some((candidate.peer, block)),
                Ok(None) => {
                    debug!("[sync] {} has no block at height {}", candidate.peer, height);
                }
                Err(e @ SyncError::UnexpectedResponse { .. }) => warn!("[sync] {}", e),
                Err(e) => warn!(
                    "[sync] Block request for height {} to {} failed: {}",
                    height, candidate.peer, e
                ),
            }
        }
        None
    }

    async fn request_block(&self, peer: &PeerId, height: u64) -> Result<Option<Block>, SyncError> {
        match self
            .request(peer, NetworkMessage::BlockRequest { height })
            .await?
        {
            NetworkMessage::BlockResponse { block } => Ok(block),
            other => Err(SyncError::UnexpectedResponse {
                peer: *peer,
                kind: other.kind(),
            }),
        }
    }

    async fn request(&self, peer: &PeerId, message: NetworkMessage) -> Result<NetworkMessage, SyncError> {
        match tokio::time::timeout(
            self.config.request_timeout(),
            self.transport.request(peer, message),
        )
        .await
        {
            Ok(response) => response.map_err(SyncError::from),
            Err(_) => Err(SyncError::Timeout {
                peer: *peer,
                timeout_ms: self.config.request_timeout_ms,
            }),
        }
    }
}

#[async_trait]
impl<T, L> SyncApi for ChainSyncService<T, L>
where
    T: PeerTransport + ?Sized,
    L: SyncLedger + ?Sized,
{
    async fn sync_once(&self) -> SyncOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            debug!("[sync] Cycle already running, skipping");
            return SyncOutcome::Skipped;
        }
        let _guard = InFlight(&self.in_flight);
        self.cycles.fetch_add(1, Ordering::Relaxed);

        let mut report = SyncReport::default();
        let finished = tokio::time::timeout(self.config.cycle_timeout(), self.run_cycle(&mut report))
            .await
            .is_ok();

        let height = self.ledger.height();
        report.reached_height = height;
        if report.applied > 0 {
            info!(
                "[sync] Applied {} block(s), height now {}",
                report.applied, height
            );
        }
        self.events
            .publish(NodeEvent::SyncCompleted {
                applied: report.applied,
                height,
            })
            .await;

        if finished {
            SyncOutcome::Completed(report)
        } else {
            self.timed_out.fetch_add(1, Ordering::Relaxed);
            SyncOutcome::TimedOut(report)
        }
    }

    fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn stats(&self) -> SyncStats {
        SyncStats {
            cycles: self.cycles.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            blocks_applied: self.blocks_applied.load(Ordering::Relaxed),
        }
    }
}
