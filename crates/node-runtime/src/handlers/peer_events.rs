//! # Peer Lifecycle Handler
//!
//! Maps transport session events onto the routing table:
//! `PeerConnected` inserts (or refreshes) the peer, `PeerDisconnected`
//! removes it.

use std::sync::Arc;

use ec_01_peer_routing::{NodeMetadata, RoutingApi, RoutingError, RoutingService};
use shared_bus::{NodeEvent, Subscription};
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub struct PeerEventHandler {
    events: Subscription,
    routing: Arc<RoutingService>,
}

impl PeerEventHandler {
    pub fn new(events: Subscription, routing: Arc<RoutingService>) -> Self {
        Self { events, routing }
    }

    /// Run until shutdown is signalled or the bus closes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("[routing] Peer event handler started");
        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => self.apply(event),
                    None => break,
                },
                _ = shutdown.changed() => {
                    info!("[routing] Shutdown signal received");
                    break;
                }
            }
        }
    }

    fn apply(&self, event: NodeEvent) {
        match event {
            NodeEvent::PeerConnected(info) => {
                let id = info.node_id;
                match self.routing.add_node(info, NodeMetadata::new()) {
                    Ok(outcome) => debug!("[routing] Peer {} connected: {:?}", id, outcome),
                    Err(RoutingError::SelfInsertion) => {}
                    Err(e) => warn!("[routing] Could not add peer {}: {}", id, e),
                }
            }
            NodeEvent::PeerDisconnected(id) => {
                if self.routing.remove_node(&id) {
                    debug!("[routing] Peer {} disconnected", id);
                }
            }
            _ => {}
        }
    }
}
