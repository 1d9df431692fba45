use crate::domain::{InsertOutcome, NodeMetadata, RoutingEntry, RoutingError};
use crate::ports::RoutingApi;
use crate::service::RoutingService;
use shared_types::{NodeId, PeerInfo};
use tracing::debug;

impl RoutingApi for RoutingService {
    fn add_node(
        &self,
        info: PeerInfo,
        metadata: NodeMetadata,
    ) -> Result<InsertOutcome, RoutingError> {
        let now = self.now();
        let node_id = info.node_id;
        let outcome = self.table.write().add_node(info, metadata, now)?;
        debug!("[routing] add_node {} -> {:?}", node_id, outcome);
        Ok(outcome)
    }

    fn update_node(
        &self,
        info: PeerInfo,
        metadata: NodeMetadata,
    ) -> Result<InsertOutcome, RoutingError> {
        let now = self.now();
        self.table.write().update_node(info, metadata, now)
    }

    fn touch_node(&self, node_id: &NodeId) -> Result<(), RoutingError> {
        let now = self.now();
        self.table.write().touch_node(node_id, now)
    }

    fn remove_node(&self, node_id: &NodeId) -> bool {
        self.table.write().remove_node(node_id).is_some()
    }

    fn get_node(&self, node_id: &NodeId) -> Option<RoutingEntry> {
        self.table.read().get_node(node_id).cloned()
    }

    fn get_closest_nodes(&self, target: &NodeId, count: usize) -> Vec<RoutingEntry> {
        self.table.read().get_closest_nodes(target, count)
    }

    fn cleanup_stale_nodes(&self) -> Vec<NodeId> {
        let now = self.now();
        self.table.write().cleanup_stale_nodes(now)
    }

    fn all_nodes(&self) -> Vec<RoutingEntry> {
        self.table.read().all_nodes()
    }
}
