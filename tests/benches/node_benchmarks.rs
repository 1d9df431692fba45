//! # Ember-Chain Benchmarks
//!
//! | Area | Measured |
//! |------|----------|
//! | ec-04 Miner | nonce search per difficulty |
//! | shared-types | merkle root per transaction count |
//! | ec-02 Ledger | block validation and append |
//! | ec-03 Mempool | admission |

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ec_02_ledger::test_utils::{child_of, seeded_ledger, transfer, TEST_NOW};
use ec_02_ledger::LedgerConfig;
use ec_03_mempool::{Mempool, MempoolConfig, TransactionValidator};
use ec_04_miner::{assemble_draft, ProofOfWork};
use shared_bus::InMemoryEventBus;
use shared_types::{merkle_root_of, FixedTimeSource, Hash, Transaction};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

fn transactions(count: usize) -> Vec<Transaction> {
    (0..count)
        .map(|i| transfer("alice", "bob", i as u64 + 1, TEST_NOW - i as u64))
        .collect()
}

fn bench_pow_search(c: &mut Criterion) {
    let rt = runtime();
    let (_ledger, _bus, genesis) = rt.block_on(seeded_ledger(LedgerConfig::for_testing()));
    let cancel = CancellationToken::new();

    let mut group = c.benchmark_group("ec-04-miner");
    for difficulty in [1u32, 2, 3] {
        group.bench_with_input(
            BenchmarkId::new("pow_search", difficulty),
            &difficulty,
            |b, &difficulty| {
                let mut ts = TEST_NOW;
                b.iter(|| {
                    ts += 1;
                    let draft = assemble_draft(&genesis, Vec::new(), "miner", 50, difficulty, ts);
                    black_box(ProofOfWork::search(draft, u64::MAX, &cancel))
                })
            },
        );
    }
    group.finish();
}

fn bench_merkle_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-types");
    for count in [1usize, 16, 256, 1024] {
        let txs = transactions(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("merkle_root", count), &txs, |b, txs| {
            b.iter(|| black_box(merkle_root_of(txs)))
        });
    }
    group.finish();
}

fn bench_ledger_append(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("ec-02-ledger");
    group.bench_function("append_block_with_64_txs", |b| {
        b.iter_batched(
            || {
                let (ledger, _bus, genesis) =
                    rt.block_on(seeded_ledger(LedgerConfig::for_testing()));
                let block = child_of(&genesis, transactions(64), 1);
                (ledger, block)
            },
            |(ledger, block)| rt.block_on(ledger.add_block(block)),
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

struct AcceptAll;

impl TransactionValidator for AcceptAll {
    fn validate(&self, _tx: &Transaction) -> Result<(), String> {
        Ok(())
    }

    fn is_included(&self, _hash: &Hash) -> bool {
        false
    }
}

fn bench_mempool_admission(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("ec-03-mempool");
    group.throughput(Throughput::Elements(256));
    group.bench_function("admit_256", |b| {
        b.iter_batched(
            || {
                let mempool = Mempool::new(
                    MempoolConfig { max_size: 1_024 },
                    Arc::new(AcceptAll),
                    Arc::new(InMemoryEventBus::new()),
                    Arc::new(FixedTimeSource(TEST_NOW)),
                );
                (mempool, transactions(256))
            },
            |(mempool, txs)| {
                rt.block_on(async {
                    for tx in txs {
                        let _ = mempool.add_transaction(tx).await;
                    }
                })
            },
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_pow_search,
    bench_merkle_root,
    bench_ledger_append,
    bench_mempool_admission
);
criterion_main!(benches);
