//! # Inbound Ports

use crate::domain::{SyncOutcome, SyncStats};
use async_trait::async_trait;

/// Sync manager API - inbound port.
#[async_trait]
pub trait SyncApi: Send + Sync {
    /// Run one cycle, or return `Skipped` if one is already running.
    async fn sync_once(&self) -> SyncOutcome;

    /// Whether a cycle is in flight.
    fn is_syncing(&self) -> bool;

    /// Counters since startup.
    fn stats(&self) -> SyncStats;
}
