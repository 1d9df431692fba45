use super::*;
use async_trait::async_trait;
use shared_bus::{EventFilter, InMemoryEventBus};
use shared_types::{BlockDraft, FixedTimeSource, Transaction, ZERO_HASH};
use std::sync::atomic::AtomicUsize;

const NOW: u64 = 1_700_000_000_000;

fn genesis() -> Block {
    BlockDraft::new(ZERO_HASH, 0, NOW, Vec::new(), 0).seal(0)
}

/// Accepts blocks that extend the current tip; others are stale.
struct MockChain {
    blocks: parking_lot::Mutex<Vec<Block>>,
    difficulty: u32,
    reject_all: bool,
    submissions: AtomicUsize,
}

impl MockChain {
    fn new(difficulty: u32) -> Self {
        Self {
            blocks: parking_lot::Mutex::new(vec![genesis()]),
            difficulty,
            reject_all: false,
            submissions: AtomicUsize::new(0),
        }
    }

    fn empty() -> Self {
        let chain = Self::new(1);
        chain.blocks.lock().clear();
        chain
    }

    fn rejecting() -> Self {
        Self {
            reject_all: true,
            ..Self::new(1)
        }
    }

    fn height(&self) -> u64 {
        self.blocks.lock().last().map_or(0, |b| b.height)
    }
}

#[async_trait]
impl BlockSubmitter for MockChain {
    fn last_block(&self) -> Option<Block> {
        self.blocks.lock().last().cloned()
    }

    fn difficulty(&self) -> u32 {
        self.difficulty
    }

    async fn submit_block(&self, block: Block) -> std::result::Result<SubmitOutcome, String> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        if self.reject_all {
            return Err("insufficient work".into());
        }
        let mut blocks = self.blocks.lock();
        let tip = blocks.last().map(|b| b.hash);
        if tip != Some(block.previous_hash) {
            return Ok(SubmitOutcome::Stale);
        }
        blocks.push(block);
        Ok(SubmitOutcome::Accepted)
    }
}

#[derive(Default)]
struct MockPool {
    pending: parking_lot::Mutex<Vec<Transaction>>,
}

impl TransactionSource for MockPool {
    fn pending_transactions(&self) -> Vec<Transaction> {
        self.pending.lock().clone()
    }

    fn remove_included(&self, block: &Block) {
        let included = block.transaction_hashes();
        self.pending.lock().retain(|tx| !included.contains(&tx.hash));
    }
}

struct Harness {
    miner: Arc<Miner>,
    chain: Arc<MockChain>,
    pool: Arc<MockPool>,
    bus: Arc<InMemoryEventBus>,
}

fn harness(chain: MockChain, config: MinerConfig) -> Harness {
    let chain = Arc::new(chain);
    let pool = Arc::new(MockPool::default());
    let bus = Arc::new(InMemoryEventBus::new());
    let deps = MinerDependencies {
        chain: chain.clone(),
        transactions: pool.clone(),
        events: bus.clone(),
        time_source: Arc::new(FixedTimeSource(NOW + 1_000)),
    };
    let miner = Arc::new(Miner::new(config, deps, CancellationToken::new()));
    Harness {
        miner,
        chain,
        pool,
        bus,
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mines_blocks_extending_tip() {
    let h = harness(MockChain::new(1), MinerConfig::for_testing());
    let mut sub = h.bus.subscribe(EventFilter::all());

    assert!(h.miner.start().await);
    let chain = h.chain.clone();
    wait_until(|| chain.height() >= 3).await;
    assert!(h.miner.stop().await);

    assert!(matches!(sub.recv().await, Some(NodeEvent::MiningStarted)));
    assert!(matches!(sub.recv().await, Some(NodeEvent::BlockMined { height: 1, .. })));

    let blocks = h.chain.blocks.lock().clone();
    for pair in blocks.windows(2) {
        assert_eq!(pair[1].previous_hash, pair[0].hash);
        assert_eq!(pair[1].height, pair[0].height + 1);
        assert!(pair[1].has_valid_hash());
        assert!(pair[1].meets_difficulty());
        assert!(pair[1].timestamp > pair[0].timestamp);
        let coinbase = pair[1].transactions.last().expect("coinbase");
        assert!(coinbase.is_coinbase());
        assert_eq!(coinbase.to, "miner");
    }
    assert_eq!(h.miner.blocks_mined(), blocks.len() as u64 - 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_included_transactions_leave_pool() {
    let h = harness(MockChain::new(1), MinerConfig::for_testing());
    let tx = Transaction::new("alice", "bob", 5, NOW, vec![0xEE; 64]);
    h.pool.pending.lock().push(tx.clone());

    h.miner.start().await;
    let pool = h.pool.clone();
    wait_until(|| pool.pending.lock().is_empty()).await;
    h.miner.stop().await;

    let blocks = h.chain.blocks.lock().clone();
    assert_eq!(blocks[1].transactions[0].hash, tx.hash);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejection_backs_off_and_retries() {
    let h = harness(MockChain::rejecting(), MinerConfig::for_testing());

    h.miner.start().await;
    let miner = h.miner.clone();
    wait_until(|| miner.failed_attempts() >= 2).await;
    h.miner.stop().await;

    assert_eq!(h.miner.blocks_mined(), 0);
    assert_eq!(h.chain.height(), 0);
    assert!(h.chain.submissions.load(Ordering::SeqCst) >= 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_waits_for_chain_tip() {
    let h = harness(MockChain::empty(), MinerConfig::for_testing());

    h.miner.start().await;
    let miner = h.miner.clone();
    wait_until(|| miner.failed_attempts() >= 1).await;
    assert!(h.miner.is_mining());
    h.miner.stop().await;

    assert_eq!(h.chain.submissions.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stop_interrupts_search() {
    let config = MinerConfig {
        max_nonce: u64::MAX,
        ..MinerConfig::for_testing()
    };
    // 64 zero nibbles is unreachable, so the search only ends on cancellation.
    let h = harness(MockChain::new(64), config);

    h.miner.start().await;
    let miner = h.miner.clone();
    wait_until(|| miner.state() == MinerState::Searching).await;

    tokio::time::timeout(Duration::from_secs(5), h.miner.stop())
        .await
        .expect("stop should not wait for the search");

    assert_eq!(h.miner.state(), MinerState::Idle);
    assert!(!h.miner.is_mining());
    assert_eq!(h.chain.submissions.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_start_twice_and_stop_when_idle() {
    let config = MinerConfig {
        max_nonce: u64::MAX,
        ..MinerConfig::for_testing()
    };
    let h = harness(MockChain::new(64), config);

    assert!(!h.miner.stop().await);
    assert!(h.miner.start().await);
    assert!(!h.miner.start().await);
    assert!(h.miner.stop().await);
    assert!(!h.miner.stop().await);

    // Restart after a stop.
    assert!(h.miner.start().await);
    assert!(h.miner.stop().await);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_token_ends_mining() {
    let chain = Arc::new(MockChain::new(64));
    let bus = Arc::new(InMemoryEventBus::new());
    let shutdown = CancellationToken::new();
    let miner = Arc::new(Miner::new(
        MinerConfig {
            max_nonce: u64::MAX,
            ..MinerConfig::for_testing()
        },
        MinerDependencies {
            chain,
            transactions: Arc::new(MockPool::default()),
            events: bus,
            time_source: Arc::new(FixedTimeSource(NOW)),
        },
        shutdown.clone(),
    ));

    miner.start().await;
    shutdown.cancel();
    let probe = miner.clone();
    wait_until(|| !probe.is_mining()).await;
    assert_eq!(miner.state(), MinerState::Stopped);
}
