//! Chain tip and append outcomes.

use shared_types::{short_hex, Hash};
use std::fmt;

/// Head of the best chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainTip {
    /// Hash of the tip block.
    pub hash: Hash,
    /// Height of the tip block.
    pub height: u64,
}

impl fmt::Display for ChainTip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.height, short_hex(&self.hash))
    }
}

/// Result of a successful `add_block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddBlockOutcome {
    /// The block extended the current tip.
    Appended,
    /// The block completed a longer branch that replaced the tip.
    Reorganized {
        /// Number of blocks dropped from the previous best chain.
        depth: u64,
    },
    /// The block was stored on a branch that is not (yet) the best chain.
    SideBranch,
    /// The block was already stored; nothing changed.
    AlreadyPresent,
}

impl AddBlockOutcome {
    /// Whether the block moved the tip.
    pub fn advanced_tip(&self) -> bool {
        matches!(self, Self::Appended | Self::Reorganized { .. })
    }

    /// Whether the block was new to this ledger.
    pub fn is_new(&self) -> bool {
        !matches!(self, Self::AlreadyPresent)
    }
}
