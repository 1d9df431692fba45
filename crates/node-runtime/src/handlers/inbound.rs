//! # Inbound Message Handler
//!
//! Entry point for every message a peer sends this node.
//!
//! | Message | Handled by |
//! |---------|------------|
//! | `new_transaction`, `new_block` | gossip (validate, store, relay) |
//! | `height_request`, `block_request` | ledger lookup |
//! | `find_node` | routing table |
//!
//! Responses arriving here unsolicited are dropped.

use std::sync::Arc;

use async_trait::async_trait;
use ec_01_peer_routing::{RoutingApi, RoutingService};
use ec_02_ledger::Ledger;
use shared_types::{NetworkMessage, NodeId, PeerId, PeerInfo};
use tracing::debug;

use crate::adapters::InboundHandler;
use crate::container::NodeGossip;

pub struct NodeMessageHandler {
    local: PeerInfo,
    ledger: Arc<Ledger>,
    gossip: Arc<NodeGossip>,
    routing: Arc<RoutingService>,
}

impl NodeMessageHandler {
    pub fn new(
        local: PeerInfo,
        ledger: Arc<Ledger>,
        gossip: Arc<NodeGossip>,
        routing: Arc<RoutingService>,
    ) -> Self {
        Self {
            local,
            ledger,
            gossip,
            routing,
        }
    }

    /// Refresh `last_seen` for a peer we already route to.
    fn touch(&self, peer: &PeerId) {
        if let Err(e) = self.routing.touch_node(peer) {
            debug!("[routing] Not refreshing {}: {}", peer, e);
        }
    }

    fn find_node(&self, target: &NodeId) -> NetworkMessage {
        let k = self.routing.with_table(|table| table.config().k);
        let node = if *target == self.local.node_id {
            Some(self.local.clone())
        } else {
            self.routing.get_node(target).map(|entry| entry.info)
        };
        let closest_nodes = self
            .routing
            .get_closest_nodes(target, k)
            .into_iter()
            .map(|entry| entry.info)
            .collect();

        NetworkMessage::FindNodeResponse {
            found: node.is_some(),
            node,
            closest_nodes,
        }
    }
}

#[async_trait]
impl InboundHandler for NodeMessageHandler {
    async fn handle(&self, from: PeerId, message: NetworkMessage) -> Option<NetworkMessage> {
        self.touch(&from);

        match message {
            NetworkMessage::NewTransaction { transaction } => {
                self.gossip.handle_transaction(&from, transaction).await;
                None
            }
            NetworkMessage::NewBlock { block } => {
                self.gossip.handle_block(&from, block).await;
                None
            }
            NetworkMessage::HeightRequest => Some(NetworkMessage::HeightResponse {
                height: self.ledger.get_height(),
            }),
            NetworkMessage::BlockRequest { height } => Some(NetworkMessage::BlockResponse {
                block: self.ledger.get_block_by_height(height),
            }),
            NetworkMessage::FindNode { target } => Some(self.find_node(&target)),
            unsolicited => {
                debug!("[net] Dropping unsolicited {} from {}", unsolicited.kind(), from);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{NodeBuilder, NodeConfig};
    use ec_01_peer_routing::NodeMetadata;
    use std::time::Duration;

    #[tokio::test]
    async fn test_messages_refresh_known_peers_only() {
        let node = NodeBuilder::new(NodeConfig::for_testing("alpha"))
            .build()
            .await
            .unwrap();
        let routing = node.services().routing.clone();
        let handler = node.message_handler();

        let known = PeerInfo::new(NodeId::derive(b"known"), "known:1");
        routing.add_node(known.clone(), NodeMetadata::new()).unwrap();
        let before = routing.get_node(&known.node_id).unwrap().last_seen;

        tokio::time::sleep(Duration::from_millis(5)).await;
        let reply = handler.handle(known.node_id, NetworkMessage::HeightRequest).await;
        assert_eq!(reply, Some(NetworkMessage::HeightResponse { height: 0 }));
        assert!(routing.get_node(&known.node_id).unwrap().last_seen > before);

        let stranger = NodeId::derive(b"stranger");
        let reply = handler.handle(stranger, NetworkMessage::HeightRequest).await;
        assert!(reply.is_some());
        assert!(routing.get_node(&stranger).is_none());
        assert_eq!(routing.all_nodes().len(), 1);
    }
}
