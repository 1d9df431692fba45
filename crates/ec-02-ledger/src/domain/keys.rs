//! Storage key layout.
//!
//! ```text
//! b:<block hash>      -> bincode(Block)
//! h:<height u64 BE>   -> block hash (best chain only)
//! t:<tx hash>         -> containing block hash (best chain only)
//! meta:last           -> tip hash
//! ```

use shared_types::Hash;

/// Key namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Block body by hash.
    Block,
    /// Best-chain hash by height.
    BlockByHeight,
    /// Containing block by transaction hash.
    Transaction,
    /// Ledger metadata.
    Metadata,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Block => b"b:",
            KeyPrefix::BlockByHeight => b"h:",
            KeyPrefix::Transaction => b"t:",
            KeyPrefix::Metadata => b"meta:",
        }
    }

    /// Build a full key with the given suffix.
    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix);
        key
    }

    pub fn block_key(hash: &Hash) -> Vec<u8> {
        KeyPrefix::Block.key(hash)
    }

    /// Big-endian so a prefix scan walks heights in order.
    pub fn height_key(height: u64) -> Vec<u8> {
        KeyPrefix::BlockByHeight.key(&height.to_be_bytes())
    }

    pub fn transaction_key(tx_hash: &Hash) -> Vec<u8> {
        KeyPrefix::Transaction.key(tx_hash)
    }

    /// Pointer to the current tip.
    pub fn tip_key() -> Vec<u8> {
        KeyPrefix::Metadata.key(b"last")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(KeyPrefix::tip_key(), b"meta:last".to_vec());
        assert_eq!(&KeyPrefix::block_key(&[7u8; 32])[..2], b"b:");
        assert_eq!(
            KeyPrefix::height_key(1),
            [b"h:".as_slice(), &[0, 0, 0, 0, 0, 0, 0, 1]].concat()
        );
    }

    proptest! {
        #[test]
        fn test_height_keys_sort_numerically(a in any::<u64>(), b in any::<u64>()) {
            prop_assert_eq!(
                KeyPrefix::height_key(a).cmp(&KeyPrefix::height_key(b)),
                a.cmp(&b)
            );
        }
    }
}
