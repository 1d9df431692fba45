//! # Blocks
//!
//! A block commits an ordered transaction list (via its merkle root) to its
//! parent hash, and is sealed by a proof-of-work nonce.
//!
//! ```text
//! hash = SHA-256(previous_hash | timestamp u64 LE | merkle_root | difficulty u32 LE | nonce u64 LE)
//! ```
//!
//! `difficulty` counts the leading zero hex digits the hash must carry.
//! Height is positional metadata and is not hashed.

use crate::entities::{Hash, ZERO_HASH};
use crate::merkle::MerkleTree;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Largest meaningful difficulty (every hex digit of a 32-byte hash).
pub const MAX_DIFFICULTY: u32 = 64;

/// A sealed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Hash of the parent block (zero for genesis).
    pub previous_hash: Hash,
    /// Creation time, epoch milliseconds.
    pub timestamp: u64,
    /// Ordered transactions.
    pub transactions: Vec<Transaction>,
    /// Required leading zero hex digits.
    pub difficulty: u32,
    /// Proof-of-work solution.
    pub nonce: u64,
    /// Merkle root over the transaction hashes.
    pub merkle_root: Hash,
    /// Block hash.
    pub hash: Hash,
    /// Parent height + 1; genesis is 0.
    pub height: u64,
}

impl Block {
    /// Recompute the header hash from the current fields.
    pub fn recompute_hash(&self) -> Hash {
        compute_block_hash(
            &self.previous_hash,
            self.timestamp,
            &self.merkle_root,
            self.difficulty,
            self.nonce,
        )
    }

    /// Recompute the merkle root over the transactions.
    pub fn compute_merkle_root(&self) -> Hash {
        merkle_root_of(&self.transactions)
    }

    /// Whether the stored hash matches the header.
    pub fn has_valid_hash(&self) -> bool {
        self.recompute_hash() == self.hash
    }

    /// Whether the stored hash satisfies the block's own difficulty.
    pub fn meets_difficulty(&self) -> bool {
        meets_difficulty(&self.hash, self.difficulty)
    }

    /// Whether the stored merkle root matches the transactions.
    pub fn has_valid_merkle_root(&self) -> bool {
        self.compute_merkle_root() == self.merkle_root
    }

    /// True for the height-0 block.
    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    /// Hashes of the contained transactions, in order.
    pub fn transaction_hashes(&self) -> Vec<Hash> {
        self.transactions.iter().map(|tx| tx.hash).collect()
    }
}

/// An unsealed block: everything but the nonce and hash.
///
/// Created by the miner, sealed by the proof-of-work search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDraft {
    pub previous_hash: Hash,
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
    pub difficulty: u32,
    pub merkle_root: Hash,
    pub height: u64,
}

impl BlockDraft {
    /// Create a draft and compute its merkle root.
    pub fn new(
        previous_hash: Hash,
        height: u64,
        timestamp: u64,
        transactions: Vec<Transaction>,
        difficulty: u32,
    ) -> Self {
        let merkle_root = merkle_root_of(&transactions);
        Self {
            previous_hash,
            timestamp,
            transactions,
            difficulty,
            merkle_root,
            height,
        }
    }

    /// Hasher pre-loaded with every header field except the nonce.
    ///
    /// Cloning it per attempt avoids re-feeding the fixed prefix.
    pub fn header_hasher(&self) -> Sha256 {
        let mut hasher = Sha256::new();
        hasher.update(self.previous_hash);
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.merkle_root);
        hasher.update(self.difficulty.to_le_bytes());
        hasher
    }

    /// Hash the header with a candidate nonce.
    pub fn hash_with_nonce(&self, nonce: u64) -> Hash {
        let mut hasher = self.header_hasher();
        hasher.update(nonce.to_le_bytes());
        hasher.finalize().into()
    }

    /// Seal the draft with a nonce.
    pub fn seal(self, nonce: u64) -> Block {
        let hash = self.hash_with_nonce(nonce);
        Block {
            previous_hash: self.previous_hash,
            timestamp: self.timestamp,
            transactions: self.transactions,
            difficulty: self.difficulty,
            nonce,
            merkle_root: self.merkle_root,
            hash,
            height: self.height,
        }
    }
}

/// Compute a block header hash.
pub fn compute_block_hash(
    previous_hash: &Hash,
    timestamp: u64,
    merkle_root: &Hash,
    difficulty: u32,
    nonce: u64,
) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(previous_hash);
    hasher.update(timestamp.to_le_bytes());
    hasher.update(merkle_root);
    hasher.update(difficulty.to_le_bytes());
    hasher.update(nonce.to_le_bytes());
    hasher.finalize().into()
}

/// Merkle root over transaction hashes.
pub fn merkle_root_of(transactions: &[Transaction]) -> Hash {
    if transactions.is_empty() {
        return ZERO_HASH;
    }
    MerkleTree::build(transactions.iter().map(|tx| tx.hash).collect()).root()
}

/// Number of leading zero hex digits in a hash.
pub fn leading_zero_nibbles(hash: &Hash) -> u32 {
    let mut count = 0;
    for byte in hash {
        if *byte == 0 {
            count += 2;
            continue;
        }
        if byte >> 4 == 0 {
            count += 1;
        }
        break;
    }
    count
}

/// Whether `hash` has at least `difficulty` leading zero hex digits.
pub fn meets_difficulty(hash: &Hash, difficulty: u32) -> bool {
    leading_zero_nibbles(hash) >= difficulty
}
