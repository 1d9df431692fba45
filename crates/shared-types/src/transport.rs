//! # Transport Port
//!
//! The P2P session layer is an external collaborator. Components reach it
//! only through [`PeerTransport`]; the node runtime supplies the adapter.

use crate::entities::PeerId;
use crate::message::NetworkMessage;
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a transport adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Peer is not connected or cannot be dialed.
    #[error("Peer unreachable: {0}")]
    PeerUnreachable(PeerId),

    /// Peer did not answer within the deadline.
    #[error("Request to {peer} timed out after {timeout_ms}ms")]
    Timeout { peer: PeerId, timeout_ms: u64 },

    /// Peer answered with an unexpected message kind.
    #[error("Unexpected response from {peer}: {kind}")]
    UnexpectedResponse { peer: PeerId, kind: String },

    /// Transport was shut down.
    #[error("Transport closed")]
    Closed,

    /// Any other adapter failure.
    #[error("Transport error: {0}")]
    Other(String),
}

/// Outbound port to the P2P transport.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Currently connected peers.
    async fn peers(&self) -> Vec<PeerId>;

    /// Fire-and-forget delivery.
    async fn send(&self, peer: &PeerId, message: NetworkMessage) -> Result<(), TransportError>;

    /// Request/response exchange.
    async fn request(
        &self,
        peer: &PeerId,
        message: NetworkMessage,
    ) -> Result<NetworkMessage, TransportError>;

    /// Deliver to every connected peer; returns how many sends succeeded.
    async fn broadcast(&self, message: NetworkMessage) -> usize {
        let mut delivered = 0;
        for peer in self.peers().await {
            if self.send(&peer, message.clone()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}
