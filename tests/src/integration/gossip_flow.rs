//! # Gossip Flow
//!
//! Push dissemination between started nodes. Peers are learned through
//! `PeerConnected` events, so every scenario waits for the routing tables
//! before pushing anything.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ec_02_ledger::test_utils::{child_of, transfer};
    use ec_05_gossip::InboundOutcome;
    use node_runtime::{LocalNetwork, Node};
    use shared_bus::{EventFilter, EventTopic, NodeEvent, Subscription};

    use crate::integration::support::{node_on, now, wait_until};

    fn mempool_events(node: &Node) -> Subscription {
        node.services()
            .events
            .subscribe(EventFilter::topics(vec![EventTopic::Mempool]))
    }

    fn drain_admissions(events: &mut Subscription) -> usize {
        let mut count = 0;
        while let Ok(Some(event)) = events.try_recv() {
            if matches!(event, NodeEvent::TransactionAdded { .. }) {
                count += 1;
            }
        }
        count
    }

    /// Three started nodes, pairwise connected.
    async fn triangle(network: &std::sync::Arc<LocalNetwork>) -> Vec<Node> {
        let nodes = vec![
            node_on(network, "alpha", false).await,
            node_on(network, "bravo", false).await,
            node_on(network, "charlie", false).await,
        ];
        for node in &nodes {
            node.start().await;
        }
        for (i, j) in [(0, 1), (0, 2), (1, 2)] {
            network.connect(&nodes[i].id(), &nodes[j].id()).await.unwrap();
        }
        let handles: Vec<_> = nodes.iter().map(Node::handle).collect();
        wait_until("routing tables", || handles.iter().all(|h| h.peers().len() == 2)).await;
        nodes
    }

    async fn shutdown(nodes: &[Node]) {
        for node in nodes {
            node.shutdown().await;
        }
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_delivery_admits_once() {
        let network = LocalNetwork::new();
        let a = node_on(&network, "alpha", false).await;
        let b = node_on(&network, "bravo", false).await;
        let c = node_on(&network, "charlie", false).await;
        let mut events = mempool_events(&b);

        let tx = transfer("alice", "bob", 10, now());
        let (from_a, from_c) = (a.id(), c.id());
        let gossip = &b.services().gossip;
        let (first, second) = tokio::join!(
            gossip.handle_transaction(&from_a, tx.clone()),
            gossip.handle_transaction(&from_c, tx.clone()),
        );

        let outcomes = [first, second];
        let accepted = outcomes
            .iter()
            .filter(|o| matches!(o, InboundOutcome::Accepted { .. }))
            .count();
        assert_eq!(accepted, 1);
        assert!(outcomes.contains(&InboundOutcome::Ignored));

        assert_eq!(b.handle().pending_transactions(), vec![tx]);
        assert_eq!(drain_admissions(&mut events), 1);
    }

    #[tokio::test]
    async fn test_transaction_reaches_every_node_exactly_once() {
        let network = LocalNetwork::new();
        let nodes = triangle(&network).await;
        let mut events: Vec<Subscription> = nodes.iter().map(mempool_events).collect();
        let handles: Vec<_> = nodes.iter().map(Node::handle).collect();

        let tx = transfer("alice", "bob", 10, now());
        handles[0].submit_transaction(tx.clone()).await.unwrap();

        wait_until("transaction everywhere", || {
            handles.iter().all(|h| h.pending_transactions().len() == 1)
        })
        .await;
        // Leave room for relays and gossip rounds still in flight.
        tokio::time::sleep(Duration::from_millis(200)).await;

        for (handle, events) in handles.iter().zip(events.iter_mut()) {
            assert_eq!(handle.pending_transactions(), vec![tx.clone()]);
            assert_eq!(drain_admissions(events), 1);
        }
        shutdown(&nodes).await;
    }

    #[tokio::test]
    async fn test_announced_block_clears_pending_everywhere() {
        let network = LocalNetwork::new();
        let nodes = triangle(&network).await;
        let handles: Vec<_> = nodes.iter().map(Node::handle).collect();

        let tx = transfer("alice", "bob", 10, now());
        handles[1].submit_transaction(tx.clone()).await.unwrap();
        wait_until("transaction everywhere", || {
            handles.iter().all(|h| h.pending_transactions().len() == 1)
        })
        .await;

        let origin = &nodes[0];
        let tip = handles[0].last_block().unwrap();
        let block = child_of(&tip, vec![tx], handles[0].difficulty());
        origin.services().ledger.add_block(block.clone()).await.unwrap();
        origin.services().gossip.announce_block(block.clone()).await;

        wait_until("block everywhere", || {
            handles
                .iter()
                .all(|h| h.height() == 1 && h.pending_transactions().is_empty())
        })
        .await;
        for handle in &handles {
            assert_eq!(handle.block_by_height(1), Some(block.clone()));
        }
        shutdown(&nodes).await;
    }

    #[tokio::test]
    async fn test_invalid_block_is_not_relayed() {
        let network = LocalNetwork::new();
        let nodes = triangle(&network).await;
        let handles: Vec<_> = nodes.iter().map(Node::handle).collect();

        let tip = handles[0].last_block().unwrap();
        let mut forged = child_of(&tip, Vec::new(), handles[0].difficulty());
        forged.nonce = forged.nonce.wrapping_add(1);

        let outcome = nodes[1]
            .services()
            .gossip
            .handle_block(&nodes[0].id(), forged)
            .await;
        assert!(matches!(outcome, InboundOutcome::Rejected(_)));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handles.iter().all(|h| h.height() == 0));
        shutdown(&nodes).await;
    }
}
