//! # Block Production (ec-04)
//!
//! Builds candidate blocks from the ledger tip and the mempool, searches for
//! a nonce that meets the difficulty target, and hands the sealed block back
//! to the ledger.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Service: Miner (start / stop / loop)       │
//! └─────────────────────────────────────────────┘
//!                       │
//! ┌─────────────────────────────────────────────┐
//! │  Ports: BlockSubmitter, TransactionSource   │
//! └─────────────────────────────────────────────┘
//!                       │
//! ┌─────────────────────────────────────────────┐
//! │  Domain: assemble_draft, ProofOfWork,       │
//! │          MinerState                         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Loop
//!
//! 1. Read the tip; build a draft with pending transactions plus a coinbase.
//! 2. Search nonces on the blocking pool until one meets the target, the
//!    nonce space runs out, or the token is cancelled.
//! 3. Submit. On acceptance, drop the included transactions from the mempool
//!    and publish `BlockMined`. On rejection, back off and retry.

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use config::MinerConfig;
pub use domain::{assemble_draft, MinerState, ProofOfWork, SearchOutcome};
pub use error::{MinerError, Result};
pub use ports::{BlockSubmitter, SubmitOutcome, TransactionSource};
pub use service::{Miner, MinerDependencies};
