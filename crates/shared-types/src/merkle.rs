//! # Merkle Tree
//!
//! Binary SHA-256 hash tree committing an ordered list of transaction hashes
//! to a single root.
//!
//! ## Construction
//!
//! - Leaves are transaction hashes, in block order.
//! - Each level pairs adjacent nodes; an odd trailing node is paired with
//!   itself. Parent = `SHA-256(left || right)`.
//! - A single leaf is its own root; an empty leaf set has the all-zero root.
//!
//! The tree keeps every level so proofs can be read off without rehashing.

use crate::entities::{Hash, ZERO_HASH};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A binary Merkle tree built from transaction hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleTree {
    /// Levels from leaves (index 0) up to the root level.
    levels: Vec<Vec<Hash>>,
    /// The computed root hash.
    root: Hash,
}

impl MerkleTree {
    /// Build a Merkle tree from leaf hashes.
    pub fn build(leaves: Vec<Hash>) -> Self {
        if leaves.is_empty() {
            return Self {
                levels: Vec::new(),
                root: ZERO_HASH,
            };
        }

        let mut levels = vec![leaves];
        while levels.last().map_or(0, Vec::len) > 1 {
            let current = &levels[levels.len() - 1];
            let next: Vec<Hash> = current
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    let right = pair.get(1).unwrap_or(left);
                    Self::hash_pair(left, right)
                })
                .collect();
            levels.push(next);
        }

        let root = levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(ZERO_HASH);

        Self { levels, root }
    }

    /// Get the root hash of this tree.
    pub fn root(&self) -> Hash {
        self.root
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Position of a leaf hash, if present.
    pub fn position_of(&self, leaf: &Hash) -> Option<usize> {
        self.levels.first()?.iter().position(|h| h == leaf)
    }

    /// Generate an inclusion proof for the leaf at `index`.
    ///
    /// Returns `None` when the index is out of range.
    pub fn generate_proof(&self, index: usize) -> Option<MerkleProof> {
        let leaf_hash = *self.levels.first()?.get(index)?;
        let mut path = Vec::with_capacity(self.levels.len());
        let mut idx = index;

        for level in &self.levels[..self.levels.len() - 1] {
            let is_right_child = idx % 2 == 1;
            let sibling_idx = if is_right_child { idx - 1 } else { idx + 1 };
            // Odd trailing node is its own sibling.
            let sibling = level.get(sibling_idx).copied().unwrap_or(level[idx]);

            path.push(ProofNode {
                hash: sibling,
                position: if is_right_child {
                    SiblingPosition::Left
                } else {
                    SiblingPosition::Right
                },
            });
            idx /= 2;
        }

        Some(MerkleProof {
            leaf_hash,
            leaf_index: index,
            root: self.root,
            path,
        })
    }

    /// Generate an inclusion proof for a leaf hash.
    pub fn proof_for(&self, leaf: &Hash) -> Option<MerkleProof> {
        self.generate_proof(self.position_of(leaf)?)
    }

    /// Verify a proof against this tree's root.
    pub fn verify_proof(&self, proof: &MerkleProof) -> bool {
        Self::verify_proof_static(&proof.leaf_hash, &proof.path, &self.root)
    }

    /// Static verification without a tree instance.
    ///
    /// Recomputes the root from leaf + path and compares.
    pub fn verify_proof_static(leaf_hash: &Hash, path: &[ProofNode], expected_root: &Hash) -> bool {
        let mut current_hash = *leaf_hash;

        for node in path {
            current_hash = match node.position {
                SiblingPosition::Left => Self::hash_pair(&node.hash, &current_hash),
                SiblingPosition::Right => Self::hash_pair(&current_hash, &node.hash),
            };
        }

        current_hash == *expected_root
    }

    /// parent = SHA-256(left || right)
    pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}

/// A cryptographic proof of transaction inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Hash of the transaction being proven.
    pub leaf_hash: Hash,
    /// Index of the transaction in the block.
    pub leaf_index: usize,
    /// The Merkle root this proof verifies against.
    pub root: Hash,
    /// Sibling hashes from leaf to root.
    pub path: Vec<ProofNode>,
}

impl MerkleProof {
    /// Verify against the root embedded in the proof.
    pub fn verify(&self) -> bool {
        MerkleTree::verify_proof_static(&self.leaf_hash, &self.path, &self.root)
    }
}

/// A single node in the Merkle proof path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    /// The sibling hash at this level.
    pub hash: Hash,
    /// Position of the sibling.
    pub position: SiblingPosition,
}

impl ProofNode {
    /// True when the sibling sits to the right of the running hash.
    pub fn is_right_sibling(&self) -> bool {
        self.position == SiblingPosition::Right
    }
}

/// Position of a sibling in the Merkle tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiblingPosition {
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hash_from_byte(b: u8) -> Hash {
        let mut h = [0u8; 32];
        h[0] = b;
        h
    }

    fn leaves(n: u8) -> Vec<Hash> {
        (0..n).map(hash_from_byte).collect()
    }

    #[test]
    fn test_empty_tree_has_zero_root() {
        let tree = MerkleTree::build(vec![]);
        assert_eq!(tree.root(), ZERO_HASH);
        assert_eq!(tree.leaf_count(), 0);
        assert!(tree.generate_proof(0).is_none());
    }

    #[test]
    fn test_single_leaf_is_root() {
        let leaf = hash_from_byte(7);
        let tree = MerkleTree::build(vec![leaf]);
        assert_eq!(tree.root(), leaf);

        let proof = tree.generate_proof(0).unwrap();
        assert!(proof.path.is_empty());
        assert!(tree.verify_proof(&proof));
    }

    #[test]
    fn test_odd_leaf_is_duplicated() {
        let l = leaves(3);
        let tree = MerkleTree::build(l.clone());

        let left = MerkleTree::hash_pair(&l[0], &l[1]);
        let right = MerkleTree::hash_pair(&l[2], &l[2]);
        assert_eq!(tree.root(), MerkleTree::hash_pair(&left, &right));
    }

    #[test]
    fn test_deterministic_root() {
        assert_eq!(
            MerkleTree::build(leaves(5)).root(),
            MerkleTree::build(leaves(5)).root()
        );
    }

    #[test]
    fn test_order_matters() {
        let mut reversed = leaves(4);
        reversed.reverse();
        assert_ne!(
            MerkleTree::build(leaves(4)).root(),
            MerkleTree::build(reversed).root()
        );
    }

    #[test]
    fn test_proof_for_every_leaf() {
        let tree = MerkleTree::build(leaves(7));
        for i in 0..7 {
            let proof = tree.generate_proof(i).unwrap();
            assert!(tree.verify_proof(&proof), "proof {i} failed");
            assert!(proof.verify());
        }
    }

    #[test]
    fn test_tampered_leaf_fails() {
        let tree = MerkleTree::build(leaves(4));
        let mut proof = tree.generate_proof(2).unwrap();
        proof.leaf_hash[31] ^= 0x01;
        assert!(!tree.verify_proof(&proof));
    }

    #[test]
    fn test_tampered_path_fails() {
        let tree = MerkleTree::build(leaves(4));
        let mut proof = tree.generate_proof(1).unwrap();
        proof.path[0].hash[0] ^= 0xFF;
        assert!(!tree.verify_proof(&proof));

        let mut flipped = tree.generate_proof(1).unwrap();
        flipped.path[1].position = match flipped.path[1].position {
            SiblingPosition::Left => SiblingPosition::Right,
            SiblingPosition::Right => SiblingPosition::Left,
        };
        assert!(!tree.verify_proof(&flipped));
    }

    #[test]
    fn test_proof_for_hash_lookup() {
        let l = leaves(6);
        let tree = MerkleTree::build(l.clone());
        let proof = tree.proof_for(&l[5]).unwrap();
        assert_eq!(proof.leaf_index, 5);
        assert!(proof.verify());
        assert!(tree.proof_for(&hash_from_byte(200)).is_none());
    }

    proptest! {
        #[test]
        fn prop_every_member_proves(raw in proptest::collection::vec(any::<[u8; 32]>(), 1..40), pick in any::<usize>()) {
            let tree = MerkleTree::build(raw.clone());
            let idx = pick % raw.len();
            let proof = tree.generate_proof(idx).unwrap();
            prop_assert!(MerkleTree::verify_proof_static(&raw[idx], &proof.path, &tree.root()));
        }
    }
}
