//! # Mempool (ec-03)
//!
//! Bounded set of validated, not-yet-included transactions.
//!
//! ## Admission
//!
//! ```text
//! add_transaction ──validate (ledger)──→ lock ──dup? full?──→ insert ──→ TransactionAdded
//! ```
//!
//! A transaction leaves the pool when a block that includes it is appended
//! (`remove_included`) or when it is removed explicitly.
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose |
//! |------|---------|
//! | `TransactionValidator` | Ledger admission check |
//! | `EventPublisher` | `TransactionAdded` notifications |

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{MempoolConfig, MempoolEntry, MempoolError, MempoolStatus, TransactionPool};
pub use ports::TransactionValidator;
pub use service::Mempool;
