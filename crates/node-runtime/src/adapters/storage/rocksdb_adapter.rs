//! # RocksDB Storage Adapter
//!
//! Persistent `KeyValueStore` for the ledger. The ledger namespaces its keys
//! by prefix (`b:`, `h:`, `t:`, `meta:`), so one default column family is
//! enough; prefix scans seek to the prefix and stop at the first key past it.
//!
//! Batches go through `WriteBatch`, which RocksDB applies atomically.

use std::path::{Path, PathBuf};

use ec_02_ledger::{BatchOperation, KeyValueStore, ScanResult};
use rocksdb::{DBCompressionType, Direction, IteratorMode, Options, WriteBatch, WriteOptions, DB};
use shared_types::StorageError;

/// RocksDB tuning.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Database directory.
    pub path: PathBuf,
    /// Memtable size in bytes (default: 64MB)
    pub write_buffer_size: usize,
    /// Memtables kept before flushing (default: 3)
    pub max_write_buffer_number: i32,
    /// fsync each write (default: true)
    pub sync_writes: bool,
}

impl RocksDbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_buffer_size: 64 * 1024 * 1024,
            max_write_buffer_number: 3,
            sync_writes: true,
        }
    }

    /// Small buffers and no fsync.
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            write_buffer_size: 4 * 1024 * 1024,
            max_write_buffer_number: 2,
            sync_writes: false,
            ..Self::new(path)
        }
    }
}

fn db_err(op: &'static str) -> impl Fn(rocksdb::Error) -> StorageError {
    move |e| StorageError::DatabaseError(format!("RocksDB {} failed: {}", op, e))
}

/// RocksDB-backed `KeyValueStore`.
pub struct RocksDbStore {
    db: DB,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Open or create the database at `config.path`.
    pub fn open(config: RocksDbConfig) -> Result<Self, StorageError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);
        opts.set_compression_type(DBCompressionType::Snappy);

        let db = DB::open(&opts, &config.path).map_err(db_err("open"))?;
        Ok(Self { db, config })
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn write_options(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self.config.sync_writes);
        opts
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        self.db.get(key).map_err(db_err("get"))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.db
            .put_opt(key, value, &self.write_options())
            .map_err(db_err("put"))
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.db
            .delete_opt(key, &self.write_options())
            .map_err(db_err("delete"))
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), StorageError> {
        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => batch.put(key, value),
                BatchOperation::Delete { key } => batch.delete(key),
            }
        }
        self.db
            .write_opt(batch, &self.write_options())
            .map_err(db_err("batch write"))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, StorageError> {
        self.db
            .get_pinned(key)
            .map(|v| v.is_some())
            .map_err(db_err("exists"))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, StorageError> {
        let mut results = Vec::new();
        for item in self.db.iterator(IteratorMode::From(prefix, Direction::Forward)) {
            let (key, value) = item.map_err(db_err("scan"))?;
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_vec(), value.to_vec()));
        }
        Ok(results)
    }
}
