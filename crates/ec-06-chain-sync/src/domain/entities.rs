use serde::Serialize;
use shared_types::PeerId;

/// Summary of one sync cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Local height when the cycle started.
    pub local_height: u64,
    /// Highest height any peer reported.
    pub target_height: u64,
    /// Blocks appended during the cycle, including any that replaced a
    /// shorter local branch.
    pub applied: u64,
    /// Local height when the cycle ended.
    pub reached_height: u64,
    /// Peers that answered the height query.
    pub peers_responded: usize,
}

impl SyncReport {
    /// Whether the local chain reached the target.
    pub fn caught_up(&self) -> bool {
        self.reached_height >= self.target_height
    }
}

/// Result of `sync_once`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The cycle ran to completion, possibly stopping early at a gap.
    Completed(SyncReport),
    /// Another cycle was already running.
    Skipped,
    /// The cycle hit `cycle_timeout`; the report covers what was applied.
    TimedOut(SyncReport),
}

impl SyncOutcome {
    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            Self::Completed(report) | Self::TimedOut(report) => Some(report),
            Self::Skipped => None,
        }
    }
}

/// A peer's answer to a height query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeerHeight {
    pub peer: PeerId,
    pub height: u64,
}

/// Counters for monitoring.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub cycles: u64,
    pub skipped: u64,
    pub timed_out: u64,
    pub blocks_applied: u64,
}
