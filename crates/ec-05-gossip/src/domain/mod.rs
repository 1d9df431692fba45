//! # Domain Layer for Gossip
//!
//! Pure logic with no I/O: configuration, the recently-seen cache and peer
//! selection.

mod errors;
mod services;
mod value_objects;

pub use errors::*;
pub use services::*;
pub use value_objects::*;
