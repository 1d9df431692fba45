//! Shared fixtures for the integration scenarios.

use std::sync::Arc;
use std::time::Duration;

use ec_02_ledger::AcceptAllSignatures;
use node_runtime::{LocalNetwork, Node, NodeBuilder, NodeConfig};
use shared_types::{SystemTimeSource, TimeSource};

/// Node on `network` that accepts unsigned transactions.
pub async fn node_on(network: &Arc<LocalNetwork>, name: &str, mining: bool) -> Node {
    let mut config = NodeConfig::for_testing(name);
    config.miner.enabled = mining;
    NodeBuilder::new(config)
        .with_signature_verifier(Arc::new(AcceptAllSignatures))
        .with_local_network(network.clone())
        .build()
        .await
        .expect("node assembly")
}

/// Poll `done` every 10ms for up to 10s.
pub async fn wait_until(what: &str, mut done: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}

pub fn now() -> u64 {
    SystemTimeSource.now_millis()
}
