//! # Node Builder
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: event bus, clock, signature verifier, store
//! Level 1: ledger (+ genesis), routing table
//! Level 2: mempool (validated by the ledger)
//! Level 3: transport, gossip, sync, miner
//! Level 4: inbound message handler, registered with the transport hub
//! ```
//!
//! Every dependency can be overridden before `build`; anything left unset
//! gets its production default.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ec_01_peer_routing::RoutingService;
use ec_02_ledger::{
    Ed25519SignatureVerifier, InMemoryKVStore, KeyValueStore, Ledger, LedgerDependencies,
    LedgerError, SignatureVerifier,
};
use ec_03_mempool::Mempool;
use ec_04_miner::{Miner, MinerDependencies};
use ec_05_gossip::GossipService;
use ec_06_chain_sync::ChainSyncService;
use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};
use shared_types::{short_hex, PeerInfo, PeerTransport, StorageError, SystemTimeSource, TimeSource};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::adapters::{
    DatabaseLock, InboundHandler, LedgerAdapter, LocalNetwork, LockError, MempoolAdapter,
    RoutedTransport,
};
use crate::container::{ConfigError, NodeConfig, NodeServices};
use crate::genesis::{GenesisBuilder, GenesisError};
use crate::handlers::NodeMessageHandler;
use crate::runtime::{Node, NodeParts};

/// Errors while assembling a node.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Genesis(#[from] GenesisError),

    #[error("ledger initialization failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("failed to open store: {0}")]
    Storage(#[from] StorageError),

    /// A data directory was configured but no persistent backend is compiled in.
    #[error("data_dir {} requires the `rocksdb` feature", .0.display())]
    PersistenceUnavailable(PathBuf),
}

/// Assembles a `Node` from configuration and optional overrides.
///
/// # Example
///
/// ```rust,ignore
/// let network = LocalNetwork::new();
/// let node = NodeBuilder::new(NodeConfig::for_testing("alpha"))
///     .with_local_network(network.clone())
///     .build()
///     .await?;
/// node.start().await;
/// ```
pub struct NodeBuilder {
    config: NodeConfig,
    store: Option<Box<dyn KeyValueStore>>,
    verifier: Option<Arc<dyn SignatureVerifier>>,
    time_source: Option<Arc<dyn TimeSource>>,
    network: Option<Arc<LocalNetwork>>,
    transport: Option<Arc<dyn PeerTransport>>,
}

impl NodeBuilder {
    pub fn new(config: NodeConfig) -> Self {
        Self {
            config,
            store: None,
            verifier: None,
            time_source: None,
            network: None,
            transport: None,
        }
    }

    /// Use `store` instead of the configured backend.
    pub fn with_store(mut self, store: Box<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_signature_verifier(mut self, verifier: Arc<dyn SignatureVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = Some(time_source);
        self
    }

    /// Join an in-process hub. The node's handler is registered on build.
    pub fn with_local_network(mut self, network: Arc<LocalNetwork>) -> Self {
        self.network = Some(network);
        self.transport = None;
        self
    }

    /// Use an external session transport. Inbound messages must then be fed
    /// to `Node::message_handler()` by the caller.
    pub fn with_transport(mut self, transport: Arc<dyn PeerTransport>) -> Self {
        self.transport = Some(transport);
        self.network = None;
        self
    }

    /// Create, wire and initialize every component.
    pub async fn build(self) -> Result<Node, NodeError> {
        let Self {
            config,
            store,
            verifier,
            time_source,
            network,
            transport,
        } = self;
        config.validate()?;

        let node_id = config.node_id();
        let info = PeerInfo::new(node_id, config.node.listen_address.clone());
        info!("Assembling node {}", node_id);

        // Level 0
        let events = Arc::new(InMemoryEventBus::new());
        let peer_events = events.subscribe(EventFilter::topics(vec![EventTopic::Peers]));
        let chain_events =
            events.subscribe(EventFilter::topics(vec![EventTopic::Chain, EventTopic::Mining]));
        let time_source = time_source.unwrap_or_else(|| Arc::new(SystemTimeSource));
        let verifier = verifier.unwrap_or_else(|| Arc::new(Ed25519SignatureVerifier));
        let (store, lock) = open_store(store, config.node.data_dir.as_deref())?;

        // Level 1
        let ledger = Arc::new(Ledger::new(
            LedgerDependencies {
                store,
                verifier,
                events: events.clone(),
                time_source: time_source.clone(),
            },
            config.ledger.clone(),
        ));
        ledger.init()?;
        let genesis = GenesisBuilder::new(config.genesis.clone()).build()?;
        ledger.seed_genesis(genesis.clone()).await?;
        info!(
            "Chain ready: genesis {} | height {}",
            short_hex(&genesis.hash),
            ledger.get_height()
        );

        let routing = Arc::new(RoutingService::new(
            node_id,
            config.routing.clone(),
            time_source.clone(),
        ));

        // Level 2
        let ledger_adapter = Arc::new(LedgerAdapter::new(ledger.clone()));
        let mempool = Arc::new(Mempool::new(
            config.mempool.clone(),
            ledger_adapter.clone(),
            events.clone(),
            time_source.clone(),
        ));
        let mempool_adapter = Arc::new(MempoolAdapter::new(mempool.clone()));

        // Level 3
        // Without a transport or hub the node gets a private hub of its own.
        let (session, network): (Arc<dyn PeerTransport>, Option<Arc<LocalNetwork>>) =
            match transport {
                Some(transport) => (transport, None),
                None => {
                    let network = network.unwrap_or_else(LocalNetwork::new);
                    (Arc::new(network.transport(node_id)), Some(network))
                }
            };
        let routed: Arc<dyn PeerTransport> =
            Arc::new(RoutedTransport::new(session, routing.clone()));

        let gossip = Arc::new(GossipService::new(
            config.gossip.clone(),
            routed.clone(),
            ledger_adapter.clone(),
            mempool_adapter.clone(),
        ));
        let sync = Arc::new(ChainSyncService::new(
            config.sync.clone(),
            routed,
            ledger_adapter.clone(),
            events.clone(),
        ));

        let shutdown = CancellationToken::new();
        let miner = Arc::new(Miner::new(
            config.miner.clone(),
            MinerDependencies {
                chain: ledger_adapter,
                transactions: mempool_adapter,
                events: events.clone(),
                time_source,
            },
            shutdown.child_token(),
        ));

        // Level 4
        let handler = Arc::new(NodeMessageHandler::new(
            info.clone(),
            ledger.clone(),
            gossip.clone(),
            routing.clone(),
        ));
        if let Some(network) = &network {
            let inbound: Arc<dyn InboundHandler> = handler.clone();
            network.register(info.clone(), &inbound, events.clone());
        }

        Ok(Node::new(NodeParts {
            config,
            info,
            services: NodeServices {
                events,
                ledger,
                mempool,
                miner,
                gossip,
                sync,
                routing,
                handler,
            },
            network,
            peer_events,
            chain_events,
            shutdown,
            lock,
        }))
    }
}

type OpenedStore = (Box<dyn KeyValueStore>, Option<DatabaseLock>);

fn open_store(
    custom: Option<Box<dyn KeyValueStore>>,
    data_dir: Option<&Path>,
) -> Result<OpenedStore, NodeError> {
    if let Some(store) = custom {
        return Ok((store, None));
    }
    match data_dir {
        Some(dir) => open_persistent(dir),
        None => {
            info!("No data_dir configured, keeping the chain in memory");
            Ok((Box::new(InMemoryKVStore::new()), None))
        }
    }
}

#[cfg(feature = "rocksdb")]
fn open_persistent(dir: &Path) -> Result<OpenedStore, NodeError> {
    use crate::adapters::{RocksDbConfig, RocksDbStore};

    let lock = DatabaseLock::acquire(dir)?;
    let store = RocksDbStore::open(RocksDbConfig::new(dir.join("chain")))?;
    info!("Opened RocksDB store at {}", store.path().display());
    Ok((Box::new(store), Some(lock)))
}

#[cfg(not(feature = "rocksdb"))]
fn open_persistent(dir: &Path) -> Result<OpenedStore, NodeError> {
    Err(NodeError::PersistenceUnavailable(dir.to_path_buf()))
}
