use shared_types::{PeerId, TransportError};
use thiserror::Error;

/// Gossip delivery errors. Logged, never propagated out of a round.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GossipError {
    #[error("Send to {peer} timed out after {timeout_ms}ms")]
    Timeout { peer: PeerId, timeout_ms: u64 },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl GossipError {
    /// A closed transport will not recover; anything else is retried next round.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Transport(TransportError::Closed))
    }
}
