//! # Routed Transport
//!
//! Wraps the session transport so that gossip and sync pick their targets
//! from the routing table instead of the raw session list. Peers reach the
//! table through `PeerConnected` events.

use std::sync::Arc;

use async_trait::async_trait;
use ec_01_peer_routing::{RoutingApi, RoutingService};
use shared_types::{NetworkMessage, PeerId, PeerTransport, TransportError};

pub struct RoutedTransport {
    inner: Arc<dyn PeerTransport>,
    routing: Arc<RoutingService>,
}

impl RoutedTransport {
    pub fn new(inner: Arc<dyn PeerTransport>, routing: Arc<RoutingService>) -> Self {
        Self { inner, routing }
    }
}

#[async_trait]
impl PeerTransport for RoutedTransport {
    async fn peers(&self) -> Vec<PeerId> {
        let mut peers: Vec<PeerId> = self
            .routing
            .all_nodes()
            .into_iter()
            .map(|entry| entry.info.node_id)
            .collect();
        peers.sort();
        peers
    }

    async fn send(&self, peer: &PeerId, message: NetworkMessage) -> Result<(), TransportError> {
        self.inner.send(peer, message).await
    }

    async fn request(
        &self,
        peer: &PeerId,
        message: NetworkMessage,
    ) -> Result<NetworkMessage, TransportError> {
        self.inner.request(peer, message).await
    }
}
