//! # Domain Errors

use shared_types::{short_hex, Hash, PeerId, TransportError};
use thiserror::Error;

/// Sync error types. None of these abort the node; a cycle stops and the
/// next one retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// Peer did not answer within `request_timeout`.
    #[error("Request to {peer} timed out after {timeout_ms}ms")]
    Timeout { peer: PeerId, timeout_ms: u64 },

    /// Transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Peer answered with the wrong message kind.
    #[error("Unexpected {kind} from {peer}")]
    UnexpectedResponse { peer: PeerId, kind: &'static str },

    /// Peer returned a block for a different height.
    #[error("Asked for height {requested}, got {returned}")]
    WrongHeight { requested: u64, returned: u64 },

    /// The block does not build on our block at `height - 1`.
    #[error("Block at height {height} links to {}, local parent is {}", short_hex(.got), .expected.as_ref().map(short_hex).unwrap_or_else(|| "none".into()))]
    Disconnected {
        height: u64,
        expected: Option<Hash>,
        got: Hash,
    },

    /// Walking a competing branch back did not reach a stored block within
    /// `limit` blocks.
    #[error("Fork below height {height} is deeper than {limit} block(s)")]
    ForkTooDeep { height: u64, limit: u64 },

    /// The peer's chain bottoms out on a genesis we do not have.
    #[error("Chain from {peer} does not share our genesis")]
    ForeignChain { peer: PeerId },

    /// While walking a branch back, the peer served nothing or a block that
    /// is not the parent of the one above it.
    #[error("{peer} has no parent for its block at height {height}")]
    BrokenBranch { peer: PeerId, height: u64 },

    /// The ledger refused the block.
    #[error("Ledger rejected block at height {height}: {reason}")]
    Rejected { height: u64, reason: String },
}

impl SyncError {
    /// Whether the next cycle can be expected to make progress.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Transport(TransportError::Closed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_message() {
        let err = SyncError::Disconnected {
            height: 7,
            expected: Some([0xAA; 32]),
            got: [0xBB; 32],
        };
        let msg = err.to_string();
        assert!(msg.contains("height 7"));
        assert!(msg.contains("aaaaaaaa"));
        assert!(msg.contains("bbbbbbbb"));
    }

    #[test]
    fn test_fork_messages() {
        let deep = SyncError::ForkTooDeep { height: 40, limit: 16 };
        assert!(deep.to_string().contains("deeper than 16"));

        let peer = PeerId::derive(b"peer");
        let foreign = SyncError::ForeignChain { peer };
        assert!(foreign.to_string().contains("genesis"));
    }

    #[test]
    fn test_recoverability() {
        assert!(SyncError::WrongHeight {
            requested: 1,
            returned: 2
        }
        .is_recoverable());
        assert!(!SyncError::Transport(TransportError::Closed).is_recoverable());
    }
}
