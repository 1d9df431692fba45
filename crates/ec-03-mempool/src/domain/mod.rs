//! Domain layer for the Mempool.

pub mod entities;
pub mod errors;
pub mod pool;

pub use entities::{MempoolConfig, MempoolEntry, MempoolStatus};
pub use errors::MempoolError;
pub use pool::TransactionPool;
