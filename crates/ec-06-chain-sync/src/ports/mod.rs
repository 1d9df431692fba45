//! # Ports
//!
//! - `inbound`: what the sync manager offers (`SyncApi`)
//! - `outbound`: what it needs from the ledger (`SyncLedger`); the network
//!   side is `shared_types::PeerTransport`

pub mod inbound;
pub mod outbound;

pub use inbound::SyncApi;
pub use outbound::SyncLedger;
