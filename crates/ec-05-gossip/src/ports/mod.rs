//! Ports used by the gossip service. The transport itself is
//! `shared_types::PeerTransport`.

pub mod outbound;

pub use outbound::{BlockImport, ChainGateway, MempoolGateway, TxAdmission};
