//! Tests for RoutingService

use super::*;
use crate::domain::{InsertOutcome, NodeMetadata, RoutingConfig, RoutingError};
use crate::ports::{RoutingApi, TimeSource};
use shared_types::{NodeId, PeerInfo, NODE_ID_LEN};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Thread-safe TimeSource for tests requiring time advancement.
struct ControllableTimeSource {
    millis: AtomicU64,
}

impl ControllableTimeSource {
    fn new(initial: u64) -> Self {
        Self {
            millis: AtomicU64::new(initial),
        }
    }

    fn advance_secs(&self, secs: u64) {
        self.millis.fetch_add(secs * 1000, Ordering::SeqCst);
    }
}

impl TimeSource for ControllableTimeSource {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Creates a NodeId with first byte set to `val`, rest zeroed.
fn make_node_id(val: u8) -> NodeId {
    let mut bytes = [0u8; NODE_ID_LEN];
    bytes[0] = val;
    NodeId::new(bytes)
}

fn make_peer(val: u8) -> PeerInfo {
    PeerInfo::new(make_node_id(val), format!("192.168.{val}.1:30333"))
}

fn setup() -> (RoutingService, Arc<ControllableTimeSource>) {
    let clock = Arc::new(ControllableTimeSource::new(1_000));
    let service = RoutingService::new(make_node_id(0), RoutingConfig::for_testing(), clock.clone());
    (service, clock)
}

#[test]
fn test_service_add_and_lookup() {
    let (service, _) = setup();

    let outcome = service.add_node(make_peer(1), NodeMetadata::new()).unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted);
    assert_eq!(service.len(), 1);
    assert_eq!(
        service.get_node(&make_node_id(1)).unwrap().info,
        make_peer(1)
    );
}

#[test]
fn test_service_remove_is_idempotent() {
    let (service, _) = setup();
    service.add_node(make_peer(1), NodeMetadata::new()).unwrap();

    assert!(service.remove_node(&make_node_id(1)));
    assert!(!service.remove_node(&make_node_id(1)));
    assert!(service.is_empty());
}

#[test]
fn test_service_cleanup_uses_clock() {
    let (service, clock) = setup();
    service.add_node(make_peer(1), NodeMetadata::new()).unwrap();

    assert!(service.cleanup_stale_nodes().is_empty());

    clock.advance_secs(11);
    assert_eq!(service.cleanup_stale_nodes(), vec![make_node_id(1)]);
    assert!(service.is_empty());
}

#[test]
fn test_service_update_refreshes_staleness() {
    let (service, clock) = setup();
    service.add_node(make_peer(1), NodeMetadata::new()).unwrap();

    clock.advance_secs(8);
    service.update_node(make_peer(1), NodeMetadata::new()).unwrap();
    clock.advance_secs(8);

    assert!(service.cleanup_stale_nodes().is_empty());
}

#[test]
fn test_service_touch_refreshes_known_nodes_only() {
    let (service, clock) = setup();
    service.add_node(make_peer(1), NodeMetadata::new()).unwrap();

    clock.advance_secs(8);
    service.touch_node(&make_node_id(1)).unwrap();
    clock.advance_secs(8);
    assert!(service.cleanup_stale_nodes().is_empty());

    assert_eq!(
        service.touch_node(&make_node_id(2)),
        Err(RoutingError::NodeNotFound(make_node_id(2)))
    );
    assert!(service.get_node(&make_node_id(2)).is_none());
    assert_eq!(service.len(), 1);
}

#[test]
fn test_service_closest_and_all_nodes() {
    let (service, _) = setup();
    for v in [4u8, 1, 9] {
        service.add_node(make_peer(v), NodeMetadata::new()).unwrap();
    }

    let closest = service.get_closest_nodes(&make_node_id(0), 2);
    let ids: Vec<_> = closest.iter().map(|e| e.info.node_id).collect();
    assert_eq!(ids, vec![make_node_id(1), make_node_id(4)]);
    assert_eq!(service.all_nodes().len(), 3);
    assert_eq!(service.local_node_id(), make_node_id(0));
}

#[tokio::test(start_paused = true)]
async fn test_maintenance_task_evicts_and_stops() {
    let (service, clock) = setup();
    let service = Arc::new(service);
    service.add_node(make_peer(1), NodeMetadata::new()).unwrap();
    clock.advance_secs(60);

    let token = CancellationToken::new();
    let handle = tokio::spawn(service.clone().run_maintenance(token.clone()));

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(service.is_empty());

    token.cancel();
    handle.await.unwrap();
}
