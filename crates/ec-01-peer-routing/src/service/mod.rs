//! # Routing Service
//!
//! Wraps the domain `RoutingTable` with a lock and a `TimeSource` so it can
//! be shared by the runtime, gossip and sync tasks.

mod api;
mod core;
mod maintenance;

pub use core::RoutingService;

#[cfg(test)]
mod tests;
