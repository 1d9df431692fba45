//! Miner state machine.
//!
//! ```text
//! Idle ──start──→ Assembling ──→ Searching ──found──→ Found ──→ Assembling
//!                     ↑              │
//!                     └──exhausted───┘
//!           any state ──stop──→ Stopped ──→ Idle
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MinerState {
    /// Not mining.
    #[default]
    Idle,
    /// Reading the tip and mempool, building a draft.
    Assembling,
    /// Searching for a nonce.
    Searching,
    /// A nonce was found; the block is being submitted.
    Found,
    /// Cancellation observed; the loop is exiting.
    Stopped,
}

impl MinerState {
    /// Whether the mining loop is live in this state.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Assembling | Self::Searching | Self::Found)
    }
}

impl fmt::Display for MinerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Assembling => "assembling",
            Self::Searching => "searching",
            Self::Found => "found",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
