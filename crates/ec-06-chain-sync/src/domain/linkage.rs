//! Checks applied to every backfilled block before it reaches the ledger.

use super::{PeerHeight, SyncError};
use shared_types::{Block, Hash};

/// Highest height among `local` and the peers' answers.
pub fn target_height(local: u64, peers: &[PeerHeight]) -> u64 {
    peers.iter().map(|p| p.height).fold(local, u64::max)
}

/// Peers worth asking for `height`, highest chain first.
pub fn candidates_for(height: u64, peers: &[PeerHeight]) -> Vec<PeerHeight> {
    let mut eligible: Vec<PeerHeight> = peers.iter().filter(|p| p.height >= height).copied().collect();
    eligible.sort_by(|a, b| b.height.cmp(&a.height));
    eligible
}

/// A fetched block must sit at `height` and build on `local_parent`.
pub fn check_linkage(block: &Block, height: u64, local_parent: Option<Hash>) -> Result<(), SyncError> {
    if block.height != height {
        return Err(SyncError::WrongHeight {
            requested: height,
            returned: block.height,
        });
    }
    if local_parent != Some(block.previous_hash) {
        return Err(SyncError::Disconnected {
            height,
            expected: local_parent,
            got: block.previous_hash,
        });
    }
    Ok(())
}
