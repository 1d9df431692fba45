//! Adapters for the ledger's driven ports.

mod memory;
mod signature;

pub use memory::InMemoryKVStore;
pub use signature::{AcceptAllSignatures, Ed25519SignatureVerifier};
