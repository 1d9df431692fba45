//! # Sync Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chain sync configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Period between cycles in ms. The first cycle runs at startup.
    pub interval_ms: u64,

    /// Deadline for a single height or block request in ms.
    pub request_timeout_ms: u64,

    /// Deadline for a whole cycle in ms.
    pub cycle_timeout_ms: u64,

    /// How many blocks to walk back along a peer's competing branch while
    /// looking for a block we already store.
    pub max_fork_depth: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            request_timeout_ms: 3_000,
            cycle_timeout_ms: 60_000,
            max_fork_depth: 100,
        }
    }
}

impl SyncConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            interval_ms: 100,
            request_timeout_ms: 100,
            cycle_timeout_ms: 2_000,
            max_fork_depth: 16,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn cycle_timeout(&self) -> Duration {
        Duration::from_millis(self.cycle_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.interval_ms == 0 {
            return Err("interval_ms must be > 0".into());
        }
        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms must be > 0".into());
        }
        if self.cycle_timeout_ms < self.request_timeout_ms {
            return Err("cycle_timeout_ms must be >= request_timeout_ms".into());
        }
        if self.max_fork_depth == 0 {
            return Err("max_fork_depth must be > 0".into());
        }
        Ok(())
    }
}
