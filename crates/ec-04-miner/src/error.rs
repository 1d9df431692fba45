//! Error types for the miner

use thiserror::Error;

/// Result type alias for miner operations
pub type Result<T> = std::result::Result<T, MinerError>;

/// Errors that can occur while mining
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MinerError {
    /// The ledger has no tip to build on yet
    #[error("No chain tip available")]
    NoChainTip,

    /// The ledger refused the sealed block
    #[error("Block rejected by ledger: {0}")]
    Rejected(String),

    /// Search was cancelled by `stop()` or shutdown
    #[error("Mining cancelled")]
    Cancelled,

    /// The blocking search task failed
    #[error("Search task failed: {0}")]
    SearchTask(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MinerError {
    /// Whether the loop should back off and retry.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::InvalidConfig(_))
    }
}
