//! # Domain Layer
//!
//! Sync outcomes, errors and the pure checks a backfilled block must pass.

mod entities;
mod errors;
mod linkage;

pub use entities::*;
pub use errors::*;
pub use linkage::*;
