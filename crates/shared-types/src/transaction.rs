//! # Transactions
//!
//! A transfer of `amount` from one identity to another, sealed by a detached
//! signature over its canonical encoding.
//!
//! ## Canonical encoding
//!
//! ```text
//! payload = len(from) u32 LE | from | len(to) u32 LE | to | amount u64 LE | timestamp u64 LE
//! hash    = SHA-256(payload | signature)
//! ```
//!
//! Transactions sent from [`COINBASE_SENDER`] are block rewards and carry no
//! signature.

use crate::entities::Hash;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use sha2::{Digest, Sha256};

/// Sender identity of reward transactions.
pub const COINBASE_SENDER: &str = "network";

/// A sealed transaction.
///
/// Fields are public for reading; `hash` is kept consistent by construction
/// and can be re-checked with [`Transaction::has_valid_hash`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender identity (hex Ed25519 public key, or `"network"`).
    pub from: String,
    /// Recipient identity.
    pub to: String,
    /// Amount in base units.
    pub amount: u64,
    /// Creation time, epoch milliseconds.
    pub timestamp: u64,
    /// Detached signature over [`Transaction::signing_payload`].
    #[serde_as(as = "Hex")]
    pub signature: Vec<u8>,
    /// SHA-256 of payload and signature.
    pub hash: Hash,
}

impl Transaction {
    /// Seal a transaction from its fields and signature.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: u64,
        timestamp: u64,
        signature: Vec<u8>,
    ) -> Self {
        let from = from.into();
        let to = to.into();
        let hash = Self::compute_hash(&from, &to, amount, timestamp, &signature);
        Self {
            from,
            to,
            amount,
            timestamp,
            signature,
            hash,
        }
    }

    /// Build and seal a transaction, signing the canonical payload with `sign`.
    pub fn signed<F>(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: u64,
        timestamp: u64,
        sign: F,
    ) -> Self
    where
        F: FnOnce(&[u8]) -> Vec<u8>,
    {
        let from = from.into();
        let to = to.into();
        let signature = sign(&Self::encode_payload(&from, &to, amount, timestamp));
        Self::new(from, to, amount, timestamp, signature)
    }

    /// Reward transaction paying `amount` to `to`.
    pub fn coinbase(to: impl Into<String>, amount: u64, timestamp: u64) -> Self {
        Self::new(COINBASE_SENDER, to, amount, timestamp, Vec::new())
    }

    /// True for reward transactions.
    pub fn is_coinbase(&self) -> bool {
        self.from == COINBASE_SENDER
    }

    /// Bytes covered by the signature.
    pub fn signing_payload(&self) -> Vec<u8> {
        Self::encode_payload(&self.from, &self.to, self.amount, self.timestamp)
    }

    /// Recompute the hash from the current fields.
    pub fn recompute_hash(&self) -> Hash {
        Self::compute_hash(
            &self.from,
            &self.to,
            self.amount,
            self.timestamp,
            &self.signature,
        )
    }

    /// Whether the stored hash matches the fields.
    pub fn has_valid_hash(&self) -> bool {
        self.recompute_hash() == self.hash
    }

    fn encode_payload(from: &str, to: &str, amount: u64, timestamp: u64) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + from.len() + to.len() + 16);
        buf.extend_from_slice(&(from.len() as u32).to_le_bytes());
        buf.extend_from_slice(from.as_bytes());
        buf.extend_from_slice(&(to.len() as u32).to_le_bytes());
        buf.extend_from_slice(to.as_bytes());
        buf.extend_from_slice(&amount.to_le_bytes());
        buf.extend_from_slice(&timestamp.to_le_bytes());
        buf
    }

    fn compute_hash(from: &str, to: &str, amount: u64, timestamp: u64, signature: &[u8]) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(Self::encode_payload(from, to, amount, timestamp));
        hasher.update(signature);
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::new("alice", "bob", 50, 1_700_000_000_000, vec![1, 2, 3])
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(sample().hash, sample().hash);
        assert_eq!(sample().recompute_hash(), sample().hash);
    }

    #[test]
    fn test_every_field_affects_hash() {
        let base = sample();
        let variants = [
            Transaction::new("alicf", "bob", 50, base.timestamp, vec![1, 2, 3]),
            Transaction::new("alice", "bob", 51, base.timestamp, vec![1, 2, 3]),
            Transaction::new("alice", "bob", 50, base.timestamp + 1, vec![1, 2, 3]),
            Transaction::new("alice", "bob", 50, base.timestamp, vec![1, 2, 4]),
        ];
        for v in variants {
            assert_ne!(v.hash, base.hash);
        }
    }

    #[test]
    fn test_length_prefix_prevents_field_shifting() {
        let a = Transaction::new("ab", "c", 1, 1, vec![]);
        let b = Transaction::new("a", "bc", 1, 1, vec![]);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_tampering_detected() {
        let mut tx = sample();
        tx.amount = 1_000;
        assert!(!tx.has_valid_hash());
    }

    #[test]
    fn test_coinbase() {
        let tx = Transaction::coinbase("miner", 50, 10);
        assert!(tx.is_coinbase());
        assert!(tx.signature.is_empty());
        assert!(!sample().is_coinbase());
    }

    #[test]
    fn test_signed_passes_payload_to_signer() {
        let tx = Transaction::signed("alice", "bob", 5, 9, |payload| payload[..4].to_vec());
        assert_eq!(tx.signature, 5u32.to_le_bytes().to_vec());
        assert!(tx.has_valid_hash());
    }

    #[test]
    fn test_json_roundtrip_keeps_hash() {
        let tx = sample();
        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains("\"signature\":\"010203\""));
        let decoded: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, tx);
    }
}
