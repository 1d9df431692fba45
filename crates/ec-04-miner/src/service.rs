//! # Mining Service
//!
//! Owns the mining task. `start()` spawns the loop under a child of the
//! node's shutdown token; `stop()` cancels it and waits for it to exit. The
//! nonce search itself runs on the blocking pool and checks the token on
//! every attempt, so a stop never submits a half-finished search.

use crate::config::MinerConfig;
use crate::domain::{assemble_draft, MinerState, ProofOfWork, SearchOutcome};
use crate::error::{MinerError, Result};
use crate::ports::{BlockSubmitter, SubmitOutcome, TransactionSource};
use parking_lot::{Mutex, RwLock};
use shared_bus::{EventPublisher, NodeEvent};
use shared_types::{short_hex, Block, TimeSource};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Dependencies for `Miner`.
pub struct MinerDependencies {
    pub chain: Arc<dyn BlockSubmitter>,
    pub transactions: Arc<dyn TransactionSource>,
    pub events: Arc<dyn EventPublisher>,
    pub time_source: Arc<dyn TimeSource>,
}

struct MiningTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Proof-of-work block producer.
pub struct Miner {
    config: MinerConfig,
    chain: Arc<dyn BlockSubmitter>,
    transactions: Arc<dyn TransactionSource>,
    events: Arc<dyn EventPublisher>,
    time_source: Arc<dyn TimeSource>,
    shutdown: CancellationToken,
    state: RwLock<MinerState>,
    blocks_mined: AtomicU64,
    failed_attempts: AtomicU64,
    task: Mutex<Option<MiningTask>>,
}

impl Miner {
    /// Create an idle miner. Every mining run is cancelled with `shutdown`.
    pub fn new(config: MinerConfig, deps: MinerDependencies, shutdown: CancellationToken) -> Self {
        info!("[miner] Initializing miner");
        info!("  Reward: {} -> {}", config.reward_amount, config.reward_address);
        info!("  Max nonce: {}", config.max_nonce);
        Self {
            config,
            chain: deps.chain,
            transactions: deps.transactions,
            events: deps.events,
            time_source: deps.time_source,
            shutdown,
            state: RwLock::new(MinerState::Idle),
            blocks_mined: AtomicU64::new(0),
            failed_attempts: AtomicU64::new(0),
            task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    pub fn state(&self) -> MinerState {
        *self.state.read()
    }

    /// Blocks mined by this process and accepted as the new tip.
    pub fn blocks_mined(&self) -> u64 {
        self.blocks_mined.load(Ordering::Relaxed)
    }

    /// Attempts that ended in an error (rejection, missing tip, task failure).
    pub fn failed_attempts(&self) -> u64 {
        self.failed_attempts.load(Ordering::Relaxed)
    }

    /// Whether the mining task is running.
    pub fn is_mining(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Start the mining loop. Returns `false` if it was already running.
    pub async fn start(self: &Arc<Self>) -> bool {
        {
            let mut task = self.task.lock();
            if task.as_ref().is_some_and(|t| !t.handle.is_finished()) {
                return false;
            }
            let cancel = self.shutdown.child_token();
            let handle = tokio::spawn(Arc::clone(self).run(cancel.clone()));
            *task = Some(MiningTask { cancel, handle });
        }

        info!("[miner] Starting block production");
        self.events.publish(NodeEvent::MiningStarted).await;
        true
    }

    /// Stop the mining loop and wait for it. Returns `false` if it was not running.
    pub async fn stop(&self) -> bool {
        let Some(task) = self.task.lock().take() else {
            return false;
        };

        info!("[miner] Stopping block production");
        task.cancel.cancel();
        if let Err(e) = task.handle.await {
            warn!("[miner] Mining task ended abnormally: {}", e);
        }
        self.set_state(MinerState::Idle);
        self.events.publish(NodeEvent::MiningStopped).await;
        true
    }

    fn set_state(&self, state: MinerState) {
        *self.state.write() = state;
    }

    async fn run(self: Arc<Self>, cancel: CancellationToken) {
        info!("[miner] PoW mining task started");

        while !cancel.is_cancelled() {
            match self.mine_once(&cancel).await {
                Ok(Some(_)) => {
                    if !pause(&cancel, self.config.block_interval_ms).await {
                        break;
                    }
                }
                Ok(None) => {}
                Err(MinerError::Cancelled) => break,
                Err(e) => {
                    self.failed_attempts.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        "[miner] Attempt failed: {} (retrying in {}ms)",
                        e, self.config.retry_backoff_ms
                    );
                    if !e.is_recoverable() || !pause(&cancel, self.config.retry_backoff_ms).await {
                        break;
                    }
                }
            }
        }

        self.set_state(MinerState::Stopped);
        info!(
            "[miner] PoW mining task stopped. Total blocks mined: {}",
            self.blocks_mined()
        );
    }

    /// One assemble/search/submit round.
    ///
    /// `Ok(None)` means the draft was discarded (nonce space exhausted or
    /// the tip moved) and assembly should restart.
    async fn mine_once(&self, cancel: &CancellationToken) -> Result<Option<Block>> {
        self.set_state(MinerState::Assembling);
        let parent = self.chain.last_block().ok_or(MinerError::NoChainTip)?;
        let draft = assemble_draft(
            &parent,
            self.transactions.pending_transactions(),
            &self.config.reward_address,
            self.config.reward_amount,
            self.chain.difficulty(),
            self.time_source.now_millis(),
        );
        debug!(
            "[miner] Mining block #{} | difficulty: {} | txs: {}",
            draft.height,
            draft.difficulty,
            draft.transactions.len()
        );

        self.set_state(MinerState::Searching);
        let max_nonce = self.config.max_nonce;
        let token = cancel.clone();
        let outcome = tokio::task::spawn_blocking(move || ProofOfWork::search(draft, max_nonce, &token))
            .await
            .map_err(|e| MinerError::SearchTask(e.to_string()))?;

        let block = match outcome {
            SearchOutcome::Found(block) => block,
            SearchOutcome::Cancelled => return Err(MinerError::Cancelled),
            SearchOutcome::Exhausted { attempts } => {
                debug!(
                    "[miner] Nonce space exhausted after {} attempts, rebuilding draft",
                    attempts
                );
                return Ok(None);
            }
        };

        self.set_state(MinerState::Found);
        info!(
            "[miner] Block #{} mined! | nonce: {} | hash: {}",
            block.height,
            block.nonce,
            short_hex(&block.hash)
        );

        match self
            .chain
            .submit_block(block.clone())
            .await
            .map_err(MinerError::Rejected)?
        {
            SubmitOutcome::Accepted => {
                self.transactions.remove_included(&block);
                self.blocks_mined.fetch_add(1, Ordering::Relaxed);
                self.events
                    .publish(NodeEvent::BlockMined {
                        hash: block.hash,
                        height: block.height,
                        nonce: block.nonce,
                    })
                    .await;
                Ok(Some(block))
            }
            SubmitOutcome::Stale => {
                info!(
                    "[miner] Block #{} went stale, tip moved during search",
                    block.height
                );
                Ok(None)
            }
        }
    }
}

/// Sleep unless cancelled first. Returns `false` on cancellation.
async fn pause(cancel: &CancellationToken, millis: u64) -> bool {
    if millis == 0 {
        tokio::task::yield_now().await;
        return !cancel.is_cancelled();
    }
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(Duration::from_millis(millis)) => true,
    }
}

#[cfg(test)]
mod tests;
