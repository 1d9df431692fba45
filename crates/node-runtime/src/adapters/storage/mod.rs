//! # Storage Adapters
//!
//! - `DatabaseLock`: one node per data directory (fs2 advisory lock)
//! - `RocksDbStore`: persistent `KeyValueStore`, behind the `rocksdb` feature
//!
//! Without a data directory the node keeps its chain in
//! `ec_02_ledger::InMemoryKVStore`.

pub mod lock;

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

pub use lock::{DatabaseLock, LockError};

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};
