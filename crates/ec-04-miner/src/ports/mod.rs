//! Ports used by the miner.

pub mod outbound;

pub use outbound::{BlockSubmitter, SubmitOutcome, TransactionSource};
