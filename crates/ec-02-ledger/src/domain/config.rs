//! Ledger configuration.

use serde::{Deserialize, Serialize};
use shared_types::{HOUR_MS, MAX_DIFFICULTY};

/// Maximum number of blocks returned by one range query.
pub const MAX_BLOCKS_PER_QUERY: u64 = 500;

/// Configuration for the ledger service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Difficulty advertised to the miner for new blocks.
    pub difficulty: u32,
    /// Lowest difficulty accepted for non-genesis blocks.
    pub min_difficulty: u32,
    /// How far into the future a block or transaction timestamp may be (ms).
    pub max_future_drift_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: 4,
            min_difficulty: 2,
            max_future_drift_ms: 2 * HOUR_MS,
        }
    }
}

impl LedgerConfig {
    /// Cheap proof-of-work for unit and integration tests.
    pub fn for_testing() -> Self {
        Self {
            difficulty: 1,
            min_difficulty: 1,
            ..Self::default()
        }
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(format!(
                "difficulty {} exceeds maximum {}",
                self.difficulty, MAX_DIFFICULTY
            ));
        }
        if self.min_difficulty > self.difficulty {
            return Err(format!(
                "min_difficulty {} is above difficulty {}",
                self.min_difficulty, self.difficulty
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LedgerConfig::default().validate().is_ok());
        assert!(LedgerConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_min_above_target_rejected() {
        let config = LedgerConfig {
            difficulty: 2,
            min_difficulty: 3,
            ..LedgerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
