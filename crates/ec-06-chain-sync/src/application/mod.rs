//! # Application Layer
//!
//! `ChainSyncService` drives the height query and the ascending backfill.

mod service;

pub use service::ChainSyncService;
