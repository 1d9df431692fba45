//! # Node Container
//!
//! Configuration and dependency injection. `NodeBuilder` creates every
//! component once, wires each one to its adapters and hands the result to
//! `Node`. Nothing is global: two builders make two independent nodes.

pub mod builder;
pub mod config;

use std::sync::Arc;

use ec_01_peer_routing::RoutingService;
use ec_02_ledger::Ledger;
use ec_03_mempool::Mempool;
use ec_04_miner::Miner;
use ec_05_gossip::GossipService;
use ec_06_chain_sync::ChainSyncService;
use shared_bus::InMemoryEventBus;
use shared_types::PeerTransport;

use crate::adapters::{LedgerAdapter, MempoolAdapter};
use crate::handlers::NodeMessageHandler;

pub use builder::{NodeBuilder, NodeError};
pub use config::{ConfigError, NodeConfig, NodeSettings};

/// Gossip manager as wired by the runtime.
pub type NodeGossip = GossipService<dyn PeerTransport, LedgerAdapter, MempoolAdapter>;

/// Sync manager as wired by the runtime.
pub type NodeSync = ChainSyncService<dyn PeerTransport, LedgerAdapter>;

/// Every component of one node.
pub struct NodeServices {
    pub events: Arc<InMemoryEventBus>,
    pub ledger: Arc<Ledger>,
    pub mempool: Arc<Mempool>,
    pub miner: Arc<Miner>,
    pub gossip: Arc<NodeGossip>,
    pub sync: Arc<NodeSync>,
    pub routing: Arc<RoutingService>,
    pub handler: Arc<NodeMessageHandler>,
}
