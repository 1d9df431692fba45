//! Configuration for the miner

use serde::{Deserialize, Serialize};

/// Runtime configuration for mining
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerConfig {
    /// Start mining when the node boots
    pub enabled: bool,

    /// Recipient of the block reward
    pub reward_address: String,

    /// Reward paid by the coinbase transaction
    pub reward_amount: u64,

    /// Highest nonce tried before the draft is rebuilt
    pub max_nonce: u64,

    /// Pause after a failed attempt (ms)
    pub retry_backoff_ms: u64,

    /// Pause after each mined block (ms), so easy targets do not flood the chain
    pub block_interval_ms: u64,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            reward_address: "miner".to_string(),
            reward_amount: 50,
            max_nonce: 50_000_000,
            retry_backoff_ms: 1_000,
            block_interval_ms: 1_000,
        }
    }
}

impl MinerConfig {
    pub fn for_testing() -> Self {
        Self {
            enabled: true,
            max_nonce: 1_000_000,
            retry_backoff_ms: 50,
            block_interval_ms: 0,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.reward_address.is_empty() {
            return Err("reward_address must not be empty".into());
        }
        if self.max_nonce == 0 {
            return Err("max_nonce must be positive".into());
        }
        Ok(())
    }
}
