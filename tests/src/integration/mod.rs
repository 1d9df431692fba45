//! Integration scenarios. Every node here runs in-process on a
//! `LocalNetwork` hub.

pub mod chain_flow;
pub mod gossip_flow;
pub mod network_flow;
pub mod sync_flow;

#[cfg(test)]
pub(crate) mod support;
