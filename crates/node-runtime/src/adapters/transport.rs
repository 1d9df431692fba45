//! # In-Process Transport
//!
//! `LocalNetwork` is a hub that connects nodes living in one process. Each
//! node registers its inbound handler; `LocalTransport` implements
//! `PeerTransport` on top of the hub.
//!
//! - `send` is fire-and-forget: delivery runs on its own task.
//! - `request` awaits the peer's handler inline.
//! - Only linked peers can talk. `connect`/`disconnect` change links and
//!   report the session change on both nodes' event buses.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::{EventPublisher, NodeEvent};
use shared_types::{NetworkMessage, PeerId, PeerInfo, PeerTransport, TransportError};
use tracing::{debug, info};

/// Receives messages addressed to a node.
#[async_trait]
pub trait InboundHandler: Send + Sync {
    /// Handle `message` from `from`. Requests return their response.
    async fn handle(&self, from: PeerId, message: NetworkMessage) -> Option<NetworkMessage>;
}

struct Endpoint {
    info: PeerInfo,
    handler: Weak<dyn InboundHandler>,
    events: Arc<dyn EventPublisher>,
}

/// In-memory hub for nodes sharing a process.
#[derive(Default)]
pub struct LocalNetwork {
    endpoints: RwLock<HashMap<PeerId, Endpoint>>,
    links: RwLock<HashMap<PeerId, HashSet<PeerId>>>,
    delivered: AtomicU64,
}

impl LocalNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Attach a node. The hub keeps only a weak reference to `handler`.
    pub fn register(
        &self,
        info: PeerInfo,
        handler: &Arc<dyn InboundHandler>,
        events: Arc<dyn EventPublisher>,
    ) {
        debug!("[net] Registered {}", info.node_id);
        self.endpoints.write().insert(
            info.node_id,
            Endpoint {
                info,
                handler: Arc::downgrade(handler),
                events,
            },
        );
    }

    /// Detach a node and drop all of its links.
    pub async fn unregister(&self, id: &PeerId) {
        let neighbours: Vec<PeerId> = self.linked_peers(id);
        for peer in neighbours {
            self.disconnect(id, &peer).await;
        }
        self.endpoints.write().remove(id);
    }

    /// Link two registered nodes. Returns `false` if already linked.
    pub async fn connect(&self, a: &PeerId, b: &PeerId) -> Result<bool, TransportError> {
        if a == b {
            return Err(TransportError::Other("cannot connect a node to itself".into()));
        }
        let (a_side, b_side) = {
            let endpoints = self.endpoints.read();
            let a_end = endpoints.get(a).ok_or(TransportError::PeerUnreachable(*a))?;
            let b_end = endpoints.get(b).ok_or(TransportError::PeerUnreachable(*b))?;
            (
                (a_end.events.clone(), b_end.info.clone()),
                (b_end.events.clone(), a_end.info.clone()),
            )
        };

        let added = {
            let mut links = self.links.write();
            let fresh = links.entry(*a).or_default().insert(*b);
            links.entry(*b).or_default().insert(*a);
            fresh
        };
        if !added {
            return Ok(false);
        }

        info!("[net] Linked {} <-> {}", a, b);
        a_side.0.publish(NodeEvent::PeerConnected(a_side.1)).await;
        b_side.0.publish(NodeEvent::PeerConnected(b_side.1)).await;
        Ok(true)
    }

    /// Remove the link between `a` and `b`. Returns whether it existed.
    pub async fn disconnect(&self, a: &PeerId, b: &PeerId) -> bool {
        let removed = {
            let mut links = self.links.write();
            let removed = links.get_mut(a).is_some_and(|set| set.remove(b));
            if let Some(set) = links.get_mut(b) {
                set.remove(a);
            }
            removed
        };
        if !removed {
            return false;
        }

        let (a_events, b_events) = {
            let endpoints = self.endpoints.read();
            (
                endpoints.get(a).map(|e| e.events.clone()),
                endpoints.get(b).map(|e| e.events.clone()),
            )
        };
        info!("[net] Unlinked {} <-> {}", a, b);
        if let Some(events) = a_events {
            events.publish(NodeEvent::PeerDisconnected(*b)).await;
        }
        if let Some(events) = b_events {
            events.publish(NodeEvent::PeerDisconnected(*a)).await;
        }
        true
    }

    /// Peers linked to `id`, sorted.
    pub fn linked_peers(&self, id: &PeerId) -> Vec<PeerId> {
        let mut peers: Vec<PeerId> = self
            .links
            .read()
            .get(id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        peers.sort();
        peers
    }

    /// Messages handed to a handler so far.
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// A transport bound to `local`.
    pub fn transport(self: &Arc<Self>, local: PeerId) -> LocalTransport {
        LocalTransport {
            local,
            network: Arc::clone(self),
        }
    }

    fn route(&self, from: &PeerId, to: &PeerId) -> Result<Arc<dyn InboundHandler>, TransportError> {
        let linked = self
            .links
            .read()
            .get(from)
            .is_some_and(|set| set.contains(to));
        if !linked {
            return Err(TransportError::PeerUnreachable(*to));
        }
        self.endpoints
            .read()
            .get(to)
            .and_then(|e| e.handler.upgrade())
            .ok_or(TransportError::PeerUnreachable(*to))
    }
}

/// `PeerTransport` for one node on a `LocalNetwork`.
#[derive(Clone)]
pub struct LocalTransport {
    local: PeerId,
    network: Arc<LocalNetwork>,
}

impl LocalTransport {
    pub fn local_id(&self) -> PeerId {
        self.local
    }
}

#[async_trait]
impl PeerTransport for LocalTransport {
    async fn peers(&self) -> Vec<PeerId> {
        self.network.linked_peers(&self.local)
    }

    async fn send(&self, peer: &PeerId, message: NetworkMessage) -> Result<(), TransportError> {
        let handler = self.network.route(&self.local, peer)?;
        self.network.delivered.fetch_add(1, Ordering::Relaxed);
        let from = self.local;
        tokio::spawn(async move {
            handler.handle(from, message).await;
        });
        Ok(())
    }

    async fn request(
        &self,
        peer: &PeerId,
        message: NetworkMessage,
    ) -> Result<NetworkMessage, TransportError> {
        let kind = message.kind();
        let handler = self.network.route(&self.local, peer)?;
        self.network.delivered.fetch_add(1, Ordering::Relaxed);
        handler
            .handle(self.local, message)
            .await
            .ok_or_else(|| TransportError::UnexpectedResponse {
                peer: *peer,
                kind: format!("no reply to {}", kind),
            })
    }
}
