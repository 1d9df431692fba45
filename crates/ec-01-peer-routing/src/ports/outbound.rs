//! # Driven Ports (Outbound SPI)
//!
//! The routing table only needs a clock.

pub use shared_types::TimeSource;
