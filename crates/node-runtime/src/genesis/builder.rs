//! # Genesis Block Builder

use serde::{Deserialize, Serialize};
use shared_types::{Block, BlockDraft, Transaction, ZERO_HASH};
use thiserror::Error;

/// Default genesis timestamp (ms since the Unix epoch).
pub const DEFAULT_GENESIS_TIMESTAMP: u64 = 1_700_000_000_000;

/// Genesis block creation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenesisError {
    /// Invalid genesis configuration.
    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(String),
}

/// Coins minted to `address` in the genesis block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAllocation {
    pub address: String,
    pub amount: u64,
}

/// Genesis block configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    /// Genesis timestamp (Unix milliseconds).
    pub timestamp: u64,

    /// Initial coin allocations, one coinbase transaction each.
    pub allocations: Vec<GenesisAllocation>,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            timestamp: DEFAULT_GENESIS_TIMESTAMP,
            allocations: Vec::new(),
        }
    }
}

impl GenesisConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), GenesisError> {
        if self.timestamp == 0 {
            return Err(GenesisError::InvalidConfig(
                "timestamp must be set".to_string(),
            ));
        }

        for allocation in &self.allocations {
            if allocation.address.is_empty() {
                return Err(GenesisError::InvalidConfig(
                    "allocation address must not be empty".to_string(),
                ));
            }
            if allocation.amount == 0 {
                return Err(GenesisError::InvalidConfig(format!(
                    "allocation to {} has zero amount",
                    allocation.address
                )));
            }
        }

        Ok(())
    }
}

/// Builds the genesis block from configuration.
pub struct GenesisBuilder {
    config: GenesisConfig,
}

impl GenesisBuilder {
    pub fn new(config: GenesisConfig) -> Self {
        Self { config }
    }

    /// Build the genesis block.
    pub fn build(&self) -> Result<Block, GenesisError> {
        self.config.validate()?;

        let transactions: Vec<Transaction> = self
            .config
            .allocations
            .iter()
            .map(|a| Transaction::coinbase(a.address.clone(), a.amount, self.config.timestamp))
            .collect();

        // Difficulty 0 accepts any hash, so nonce 0 seals it.
        Ok(BlockDraft::new(ZERO_HASH, 0, self.config.timestamp, transactions, 0).seal(0))
    }
}
