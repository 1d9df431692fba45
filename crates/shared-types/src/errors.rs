//! # Error Types
//!
//! Errors shared across components.

use thiserror::Error;

/// Errors raised by a key-value store backing the ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Stored bytes could not be decoded.
    #[error("Data corruption: {0}")]
    DataCorruption(String),

    /// Value could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
