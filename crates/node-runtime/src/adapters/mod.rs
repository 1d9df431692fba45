//! # Adapter Implementations
//!
//! Concrete implementations of the outbound ports each component declares,
//! plus the infrastructure the node plugs into:
//!
//! ```text
//!  Mempool ──TransactionValidator──┐
//!  Miner ────BlockSubmitter────────┤
//!  Gossip ───ChainGateway──────────┼──> LedgerAdapter ──> Ledger
//!  Sync ─────SyncLedger────────────┘
//!
//!  Miner ────TransactionSource─────┐
//!  Gossip ───MempoolGateway────────┴──> MempoolAdapter ─> Mempool
//!
//!  Gossip, Sync ──PeerTransport──> RoutedTransport ──> LocalTransport
//! ```

pub mod ledger;
pub mod mempool;
pub mod routed;
pub mod storage;
pub mod transport;

pub use ledger::LedgerAdapter;
pub use mempool::MempoolAdapter;
pub use routed::RoutedTransport;
pub use storage::{DatabaseLock, LockError};
pub use transport::{InboundHandler, LocalNetwork, LocalTransport};

#[cfg(feature = "rocksdb")]
pub use storage::{RocksDbConfig, RocksDbStore};
