//! Outbound (Driven) ports for the Mempool.

use shared_types::{Hash, Transaction};

/// Ledger-backed admission check.
///
/// Production: the ledger's `validate_transaction`, adapted in node-runtime.
pub trait TransactionValidator: Send + Sync {
    /// `Err(reason)` if the transaction must not be admitted.
    fn validate(&self, tx: &Transaction) -> Result<(), String>;

    /// Whether a best-chain block already carries `hash`.
    ///
    /// Asked again under the pool lock, after `validate`.
    fn is_included(&self, hash: &Hash) -> bool;
}
