//! # Node Runtime Library
//!
//! Assembles one Ember-Chain node out of the component crates and runs it.
//! The `node-runtime` binary is a thin wrapper; integration tests build
//! several nodes in one process through this library.
//!
//! ## Layout
//!
//! - `container`: configuration and `NodeBuilder` (dependency injection)
//! - `adapters`: component ports implemented over other components, plus
//!   the in-process transport and persistent storage
//! - `handlers`: inbound network messages and event-bus reactions
//! - `genesis`: the deterministic genesis block
//! - `runtime`: `Node` lifecycle and the `NodeHandle` control plane

#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod container;
pub mod genesis;
pub mod handlers;
pub mod runtime;

pub use adapters::{InboundHandler, LocalNetwork, LocalTransport};
pub use container::{NodeBuilder, NodeConfig, NodeError, NodeServices};
pub use genesis::{GenesisBuilder, GenesisConfig};
pub use runtime::{Node, NodeHandle};
