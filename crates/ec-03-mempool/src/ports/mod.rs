//! Ports for the Mempool.

pub mod outbound;

pub use outbound::TransactionValidator;
