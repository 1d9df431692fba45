//! # Node Runtime
//!
//! Owns an assembled node and drives its background tasks.
//!
//! ## Tasks
//!
//! | Task | Source |
//! |------|--------|
//! | gossip tick | `GossipService::run` |
//! | sync tick | `ChainSyncService::run` |
//! | routing maintenance | `RoutingService::run_maintenance` |
//! | peer lifecycle | `PeerEventHandler` |
//! | mempool cleanup, block announce | `ChainEventHandler` |
//! | mining (optional) | `Miner::start` |
//!
//! ## Shutdown
//!
//! The service loops watch a root `CancellationToken`; the event handlers
//! watch a `watch` channel. `shutdown` fires both, then joins every task.

mod handle;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared_bus::Subscription;
use shared_types::{NodeId, PeerInfo};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::adapters::{DatabaseLock, LocalNetwork};
use crate::container::{NodeConfig, NodeServices};
use crate::handlers::{ChainEventHandler, NodeMessageHandler, PeerEventHandler};

pub use handle::NodeHandle;

/// How long `shutdown` waits for each task.
const TASK_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything `NodeBuilder` hands over.
pub(crate) struct NodeParts {
    pub config: NodeConfig,
    pub info: PeerInfo,
    pub services: NodeServices,
    pub network: Option<Arc<LocalNetwork>>,
    pub peer_events: Subscription,
    pub chain_events: Subscription,
    pub shutdown: CancellationToken,
    pub lock: Option<DatabaseLock>,
}

/// A running (or ready to run) node.
pub struct Node {
    config: NodeConfig,
    info: PeerInfo,
    services: NodeServices,
    network: Option<Arc<LocalNetwork>>,
    subscriptions: Mutex<Option<(Subscription, Subscription)>>,
    shutdown: CancellationToken,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    stopped: AtomicBool,
    _lock: Option<DatabaseLock>,
}

impl Node {
    pub(crate) fn new(parts: NodeParts) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config: parts.config,
            info: parts.info,
            services: parts.services,
            network: parts.network,
            subscriptions: Mutex::new(Some((parts.peer_events, parts.chain_events))),
            shutdown: parts.shutdown,
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
            stopped: AtomicBool::new(false),
            _lock: parts.lock,
        }
    }

    pub fn id(&self) -> NodeId {
        self.info.node_id
    }

    pub fn info(&self) -> &PeerInfo {
        &self.info
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Direct access to the components.
    pub fn services(&self) -> &NodeServices {
        &self.services
    }

    /// The hub this node is registered on, if any.
    pub fn network(&self) -> Option<&Arc<LocalNetwork>> {
        self.network.as_ref()
    }

    /// Entry point for messages from an external transport.
    pub fn message_handler(&self) -> Arc<NodeMessageHandler> {
        Arc::clone(&self.services.handler)
    }

    /// Control-plane handle for API layers.
    pub fn handle(&self) -> NodeHandle {
        NodeHandle::new(self.info.node_id, &self.services)
    }

    /// Spawn the background tasks. Returns `false` if already started.
    pub async fn start(&self) -> bool {
        let Some((peer_events, chain_events)) = self.subscriptions.lock().take() else {
            return false;
        };
        let services = &self.services;

        info!("===========================================");
        info!("  Ember-Chain Node v{}", env!("CARGO_PKG_VERSION"));
        info!("  Node ID: {}", self.info.node_id);
        info!("===========================================");

        let mut tasks = vec![
            tokio::spawn(
                Arc::clone(&services.gossip).run(self.shutdown.child_token()),
            ),
            tokio::spawn(Arc::clone(&services.sync).run(self.shutdown.child_token())),
            tokio::spawn(
                Arc::clone(&services.routing).run_maintenance(self.shutdown.child_token()),
            ),
            tokio::spawn(
                PeerEventHandler::new(peer_events, Arc::clone(&services.routing))
                    .run(self.shutdown_rx.clone()),
            ),
            tokio::spawn(
                ChainEventHandler::new(
                    chain_events,
                    Arc::clone(&services.ledger),
                    Arc::clone(&services.mempool),
                    Arc::clone(&services.gossip),
                )
                .run(self.shutdown_rx.clone()),
            ),
        ];
        self.tasks.lock().append(&mut tasks);

        if self.config.miner.enabled {
            services.miner.start().await;
        }

        info!(
            "Node running | height {} | mining {}",
            services.ledger.get_height(),
            services.miner.is_mining()
        );
        true
    }

    /// Stop mining, signal every task and wait for them to finish.
    pub async fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("Initiating graceful shutdown...");

        self.services.miner.stop().await;
        self.shutdown.cancel();
        if self.shutdown_tx.send(true).is_err() {
            warn!("Shutdown signal had no receivers");
        }

        let tasks: Vec<JoinHandle<()>> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            if tokio::time::timeout(TASK_JOIN_TIMEOUT, task).await.is_err() {
                warn!("A task did not stop within {:?}", TASK_JOIN_TIMEOUT);
            }
        }

        if let Some(network) = &self.network {
            network.unregister(&self.info.node_id).await;
        }
        info!("Shutdown complete");
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        self.shutdown.cancel();
        let _ = self.shutdown_tx.send(true);
    }
}
