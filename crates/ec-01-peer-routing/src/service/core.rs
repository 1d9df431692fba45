use crate::domain::{RoutingConfig, RoutingTable, Timestamp};
use crate::ports::TimeSource;
use parking_lot::RwLock;
use shared_types::NodeId;
use std::sync::Arc;

/// Routing service implementing the driving port.
///
/// # Example
///
/// ```rust,ignore
/// use ec_01_peer_routing::{RoutingApi, RoutingConfig, RoutingService};
/// use shared_types::{NodeId, SystemTimeSource};
///
/// let service = RoutingService::new(NodeId::derive(b"local"), RoutingConfig::default(), Arc::new(SystemTimeSource));
/// let closest = service.get_closest_nodes(&target, 20);
/// ```
pub struct RoutingService {
    pub(crate) table: RwLock<RoutingTable>,
    pub(crate) time_source: Arc<dyn TimeSource>,
}

impl RoutingService {
    /// Create a new routing service.
    pub fn new(
        local_node_id: NodeId,
        config: RoutingConfig,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            table: RwLock::new(RoutingTable::new(local_node_id, config)),
            time_source,
        }
    }

    pub(crate) fn now(&self) -> Timestamp {
        Timestamp::new(self.time_source.now_millis())
    }

    /// Our own node ID.
    pub fn local_node_id(&self) -> NodeId {
        *self.table.read().local_node_id()
    }

    /// Number of stored nodes.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Whether no nodes are stored.
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Run `f` against the table under a read lock.
    pub fn with_table<R>(&self, f: impl FnOnce(&RoutingTable) -> R) -> R {
        f(&self.table.read())
    }
}
