//! Domain logic for mining: state machine, block template, nonce search.

pub mod entities;
pub mod pow;
pub mod template;

pub use entities::MinerState;
pub use pow::{ProofOfWork, SearchOutcome};
pub use template::assemble_draft;
