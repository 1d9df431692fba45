//! # Ledger Service
//!
//! Owns the store and the in-memory tip. All writes funnel through
//! `add_block`, which holds a single async writer lock for validation,
//! persistence and the tip update, so two concurrent appends of the same
//! block resolve to one `Appended` and one `AlreadyPresent`.

mod append;
mod queries;

use crate::domain::{ChainTip, KeyPrefix, LedgerConfig, LedgerError, ValidationError};
use crate::ports::{KeyValueStore, SignatureVerifier};
use parking_lot::RwLock;
use shared_bus::{EventPublisher, NodeEvent};
use shared_types::{short_hex, Block, Hash, StorageError, TimeSource};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub use append::encode_block;

/// Dependencies for `Ledger`.
pub struct LedgerDependencies {
    pub store: Box<dyn KeyValueStore>,
    pub verifier: Arc<dyn SignatureVerifier>,
    pub events: Arc<dyn EventPublisher>,
    pub time_source: Arc<dyn TimeSource>,
}

/// The validated, append-only chain.
pub struct Ledger {
    pub(crate) store: RwLock<Box<dyn KeyValueStore>>,
    pub(crate) verifier: Arc<dyn SignatureVerifier>,
    pub(crate) events: Arc<dyn EventPublisher>,
    pub(crate) time_source: Arc<dyn TimeSource>,
    pub(crate) config: LedgerConfig,
    pub(crate) tip: RwLock<Option<ChainTip>>,
    pub(crate) writer: Mutex<()>,
}

impl Ledger {
    /// Create a ledger over `deps.store`. Call `init()` before use.
    pub fn new(deps: LedgerDependencies, config: LedgerConfig) -> Self {
        Self {
            store: RwLock::new(deps.store),
            verifier: deps.verifier,
            events: deps.events,
            time_source: deps.time_source,
            config,
            tip: RwLock::new(None),
            writer: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Load the persisted tip, if any.
    ///
    /// Returns `None` for an empty store; the caller then seeds a genesis.
    pub fn init(&self) -> Result<Option<ChainTip>, LedgerError> {
        let Some(raw) = self.store.read().get(&KeyPrefix::tip_key())? else {
            info!("[ledger] Empty store, waiting for genesis");
            return Ok(None);
        };

        let hash: Hash = raw
            .as_slice()
            .try_into()
            .map_err(|_| StorageError::DataCorruption("tip pointer is not 32 bytes".into()))?;
        let block = self.load_block(&hash)?.ok_or_else(|| {
            StorageError::DataCorruption(format!("tip block {} missing", short_hex(&hash)))
        })?;

        let tip = ChainTip {
            hash,
            height: block.height,
        };
        *self.tip.write() = Some(tip);
        info!("[ledger] Loaded chain tip {}", tip);
        Ok(Some(tip))
    }

    /// Write `genesis` into an empty ledger.
    ///
    /// Seeding the same genesis again is a no-op (`AlreadyPresent`); a
    /// different one is rejected.
    pub async fn seed_genesis(
        &self,
        genesis: Block,
    ) -> Result<crate::domain::AddBlockOutcome, LedgerError> {
        if genesis.height != 0 {
            return Err(ValidationError::InvalidGenesis.into());
        }
        let hash = genesis.hash;
        let outcome = self.add_block(genesis).await?;
        if outcome.advanced_tip() {
            info!("[ledger] Genesis initialized: {}", short_hex(&hash));
            self.events
                .publish(NodeEvent::GenesisInitialized { hash })
                .await;
        }
        Ok(outcome)
    }

    /// Whether a tip exists.
    pub fn is_initialized(&self) -> bool {
        self.tip.read().is_some()
    }

    /// Current best-chain tip.
    pub fn tip(&self) -> Option<ChainTip> {
        *self.tip.read()
    }

    pub(crate) fn load_block(&self, hash: &Hash) -> Result<Option<Block>, StorageError> {
        self.store
            .read()
            .get(&KeyPrefix::block_key(hash))?
            .map(|bytes| decode_block(&bytes))
            .transpose()
    }

    pub(crate) fn hash_at_height(&self, height: u64) -> Result<Option<Hash>, StorageError> {
        self.store
            .read()
            .get(&KeyPrefix::height_key(height))?
            .map(|raw| {
                raw.as_slice().try_into().map_err(|_| {
                    StorageError::DataCorruption(format!("height index {height} is not 32 bytes"))
                })
            })
            .transpose()
    }

    /// Best-chain block indexed for `tx_hash`.
    pub(crate) fn indexed_transaction(&self, tx_hash: &Hash) -> Result<Option<Hash>, StorageError> {
        self.store
            .read()
            .get(&KeyPrefix::transaction_key(tx_hash))?
            .map(|raw| {
                raw.as_slice().try_into().map_err(|_| {
                    StorageError::DataCorruption("transaction index is not 32 bytes".into())
                })
            })
            .transpose()
    }

    pub(crate) fn block_at_height(&self, height: u64) -> Result<Option<Block>, StorageError> {
        match self.hash_at_height(height)? {
            Some(hash) => self.load_block(&hash),
            None => Ok(None),
        }
    }
}

pub(crate) fn decode_block(bytes: &[u8]) -> Result<Block, StorageError> {
    bincode::deserialize(bytes).map_err(|e| StorageError::DataCorruption(e.to_string()))
}
