//! # Sync Flow
//!
//! A fresh node catching up with a longer peer over the in-process hub.
//! The sync service is built by hand around a transport that counts and
//! slows block fetches, so overlapping cycles can be observed.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use ec_02_ledger::test_utils::{chain_from, child_at};
    use ec_06_chain_sync::{ChainSyncService, SyncApi, SyncConfig, SyncOutcome};
    use node_runtime::adapters::LedgerAdapter;
    use node_runtime::{LocalNetwork, LocalTransport, Node};
    use shared_types::{NetworkMessage, PeerId, PeerTransport, TransportError};

    use crate::integration::support::node_on;

    /// Hub transport that counts block fetches and delays each one.
    struct CountingTransport {
        inner: LocalTransport,
        block_requests: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl PeerTransport for CountingTransport {
        async fn peers(&self) -> Vec<PeerId> {
            self.inner.peers().await
        }

        async fn send(&self, peer: &PeerId, message: NetworkMessage) -> Result<(), TransportError> {
            self.inner.send(peer, message).await
        }

        async fn request(
            &self,
            peer: &PeerId,
            message: NetworkMessage,
        ) -> Result<NetworkMessage, TransportError> {
            if matches!(message, NetworkMessage::BlockRequest { .. }) {
                self.block_requests.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(self.delay).await;
            }
            self.inner.request(peer, message).await
        }
    }

    async fn extend(node: &Node, count: usize) {
        let handle = node.handle();
        let tip = handle.last_block().unwrap();
        for block in chain_from(&tip, count, handle.difficulty()) {
            node.services().ledger.add_block(block).await.unwrap();
        }
    }

    fn sync_for(
        network: &Arc<LocalNetwork>,
        node: &Node,
    ) -> (
        Arc<ChainSyncService<CountingTransport, LedgerAdapter>>,
        Arc<CountingTransport>,
    ) {
        let transport = Arc::new(CountingTransport {
            inner: network.transport(node.id()),
            block_requests: AtomicUsize::new(0),
            delay: Duration::from_millis(5),
        });
        let sync = Arc::new(ChainSyncService::new(
            SyncConfig {
                cycle_timeout_ms: 10_000,
                ..SyncConfig::for_testing()
            },
            transport.clone(),
            Arc::new(LedgerAdapter::new(node.services().ledger.clone())),
            node.services().events.clone(),
        ));
        (sync, transport)
    }

    #[tokio::test]
    async fn test_overlapping_cycles_fetch_each_block_once() {
        let network = LocalNetwork::new();
        let ahead = node_on(&network, "ahead", false).await;
        let behind = node_on(&network, "behind", false).await;
        extend(&ahead, 5).await;
        network.connect(&ahead.id(), &behind.id()).await.unwrap();

        let (sync, transport) = sync_for(&network, &behind);
        let (first, second) = tokio::join!(sync.sync_once(), sync.sync_once());

        assert_eq!(second, SyncOutcome::Skipped);
        let report = first.report().cloned().unwrap();
        assert_eq!(report.applied, 5);
        assert_eq!(report.target_height, 5);
        assert_eq!(transport.block_requests.load(Ordering::SeqCst), 5);

        let (ha, hb) = (ahead.handle(), behind.handle());
        assert_eq!(hb.height(), 5);
        assert_eq!(hb.last_block(), ha.last_block());

        // Caught up: the next cycle fetches nothing.
        let third = sync.sync_once().await;
        assert_eq!(third.report().map(|r| r.applied), Some(0));
        assert_eq!(transport.block_requests.load(Ordering::SeqCst), 5);
    }

    /// Mine `count` empty blocks spaced `step` ms apart on top of the tip.
    async fn extend_spaced(node: &Node, count: usize, step: u64) {
        let handle = node.handle();
        for _ in 0..count {
            let tip = handle.last_block().unwrap();
            let block = child_at(&tip, vec![], handle.difficulty(), tip.timestamp + step);
            node.services().ledger.add_block(block).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_diverged_node_adopts_longer_chain() {
        let network = LocalNetwork::new();
        let short = node_on(&network, "short", false).await;
        let long = node_on(&network, "long", false).await;
        extend_spaced(&short, 2, 1_500).await;
        extend(&long, 5).await;
        assert_ne!(
            short.handle().last_block().map(|b| b.hash),
            long.handle().block_by_height(2).map(|b| b.hash)
        );
        network.connect(&short.id(), &long.id()).await.unwrap();

        let (sync, transport) = sync_for(&network, &short);
        let outcome = sync.sync_once().await;

        let report = outcome.report().cloned().unwrap();
        assert_eq!(report.local_height, 2);
        assert_eq!(report.applied, 5);
        assert!(report.caught_up());
        // Heights 3, 2, 1 to find the fork, then 4 and 5.
        assert_eq!(transport.block_requests.load(Ordering::SeqCst), 5);

        let (hs, hl) = (short.handle(), long.handle());
        assert_eq!(hs.height(), 5);
        assert_eq!(hs.last_block(), hl.last_block());
        assert_eq!(
            hs.block_by_height(1).map(|b| b.hash),
            hl.block_by_height(1).map(|b| b.hash)
        );

        let again = sync.sync_once().await;
        assert_eq!(again.report().map(|r| r.applied), Some(0));
    }

    #[tokio::test]
    async fn test_sync_without_peers_is_a_no_op() {
        let network = LocalNetwork::new();
        let lonely = node_on(&network, "lonely", false).await;

        let (sync, transport) = sync_for(&network, &lonely);
        let outcome = sync.sync_once().await;

        assert_eq!(outcome.report().map(|r| r.applied), Some(0));
        assert_eq!(transport.block_requests.load(Ordering::SeqCst), 0);
        assert_eq!(lonely.handle().height(), 0);
    }

    #[tokio::test]
    async fn test_sync_resumes_after_peer_grows() {
        let network = LocalNetwork::new();
        let ahead = node_on(&network, "ahead", false).await;
        let behind = node_on(&network, "behind", false).await;
        network.connect(&ahead.id(), &behind.id()).await.unwrap();
        let (sync, _transport) = sync_for(&network, &behind);

        extend(&ahead, 2).await;
        sync.sync_once().await;
        assert_eq!(behind.handle().height(), 2);

        extend(&ahead, 3).await;
        let outcome = sync.sync_once().await;
        assert_eq!(outcome.report().map(|r| r.applied), Some(3));
        assert_eq!(behind.handle().height(), 5);
    }
}
