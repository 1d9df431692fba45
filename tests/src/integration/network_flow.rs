//! # Network Flow
//!
//! Several started nodes with one miner. Blocks travel by gossip relay and
//! gaps are filled by sync, so every node must end on the miner's tip.

#[cfg(test)]
mod tests {
    use node_runtime::{LocalNetwork, Node, NodeHandle};

    use crate::integration::support::{node_on, now, wait_until};
    use ec_02_ledger::test_utils::transfer;

    fn same_tip(handles: &[NodeHandle]) -> bool {
        let first = handles[0].tip();
        first.is_some() && handles.iter().all(|h| h.tip() == first)
    }

    async fn shutdown(nodes: &[Node]) {
        for node in nodes {
            node.shutdown().await;
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_line_topology_converges_on_miner_tip() {
        let network = LocalNetwork::new();
        let nodes = vec![
            node_on(&network, "miner", true).await,
            node_on(&network, "relay", false).await,
            node_on(&network, "edge", false).await,
        ];
        for node in &nodes {
            node.start().await;
        }
        network.connect(&nodes[0].id(), &nodes[1].id()).await.unwrap();
        network.connect(&nodes[1].id(), &nodes[2].id()).await.unwrap();
        let handles: Vec<NodeHandle> = nodes.iter().map(Node::handle).collect();

        wait_until("edge reaches height 3", || handles[2].height() >= 3).await;
        handles[0].stop_mining().await;

        wait_until("common tip", || same_tip(&handles)).await;
        let height = handles[0].height();
        for h in 1..=height {
            let expected = handles[0].block_by_height(h);
            assert!(expected.is_some());
            assert!(handles.iter().all(|other| other.block_by_height(h) == expected));
        }
        assert_eq!(handles[1].blocks_mined(), 0);
        shutdown(&nodes).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_late_joiner_catches_up() {
        let network = LocalNetwork::new();
        let miner = node_on(&network, "miner", true).await;
        miner.start().await;
        let miner_handle = miner.handle();
        wait_until("miner reaches height 4", || miner_handle.height() >= 4).await;
        miner_handle.stop_mining().await;

        let late = node_on(&network, "late", false).await;
        late.start().await;
        network.connect(&miner.id(), &late.id()).await.unwrap();

        let handles = vec![miner_handle, late.handle()];
        wait_until("late node synced", || same_tip(&handles)).await;
        assert_eq!(handles[1].height(), handles[0].height());

        late.shutdown().await;
        miner.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_transaction_from_edge_is_mined_and_seen_everywhere() {
        let network = LocalNetwork::new();
        let nodes = vec![
            node_on(&network, "miner", false).await,
            node_on(&network, "relay", false).await,
            node_on(&network, "edge", false).await,
        ];
        for node in &nodes {
            node.start().await;
        }
        network.connect(&nodes[0].id(), &nodes[1].id()).await.unwrap();
        network.connect(&nodes[1].id(), &nodes[2].id()).await.unwrap();
        let handles: Vec<NodeHandle> = nodes.iter().map(Node::handle).collect();
        wait_until("routing tables", || {
            handles[0].peers().len() == 1 && handles[2].peers().len() == 1
        })
        .await;

        let tx = transfer("alice", "bob", 25, now());
        handles[2].submit_transaction(tx.clone()).await.unwrap();
        wait_until("miner sees the transaction", || {
            handles[0].pending_transactions().contains(&tx)
        })
        .await;

        handles[0].start_mining().await;
        let confirmed = |h: &NodeHandle| {
            (1..=h.height())
                .filter_map(|height| h.block_by_height(height))
                .any(|b| b.transactions.contains(&tx))
        };
        wait_until("confirmed everywhere", || {
            handles
                .iter()
                .all(|h| confirmed(h) && h.pending_transactions().is_empty())
        })
        .await;
        handles[0].stop_mining().await;
        shutdown(&nodes).await;
    }
}
