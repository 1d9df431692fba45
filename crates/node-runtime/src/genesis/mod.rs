//! # Genesis Module
//!
//! The genesis block anchors the chain:
//!
//! - Height: 0
//! - Previous hash: 32 zero bytes
//! - Difficulty: 0, nonce 0
//! - Timestamp: fixed by configuration, never the wall clock
//!
//! Every node of a network must build a byte-identical genesis, so the
//! builder is a pure function of `GenesisConfig`.

pub mod builder;

pub use builder::{GenesisAllocation, GenesisBuilder, GenesisConfig, GenesisError};
