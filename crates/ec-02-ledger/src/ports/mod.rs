//! # Ports
//!
//! Driven ports the ledger needs from its host: a key-value store and a
//! signature verifier.

pub mod outbound;

pub use outbound::{BatchOperation, KeyValueStore, ScanResult, SignatureVerifier};
