//! # Chain Sync (ec-06)
//!
//! Height-driven catch-up: compare our height with every peer's, then
//! backfill the missing blocks in ascending order. A peer on a competing,
//! longer branch is followed back to the fork point first.
//!
//! ## Module Structure
//!
//! ```text
//! ec-06-chain-sync/
//! ├── domain/          # SyncReport, SyncOutcome, SyncError, linkage checks
//! ├── ports/           # SyncApi (inbound) + SyncLedger (outbound)
//! ├── application/     # ChainSyncService
//! └── config.rs        # SyncConfig
//! ```
//!
//! Only one cycle runs at a time. A second `sync_once` while one is in
//! flight returns `SyncOutcome::Skipped` immediately.

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::ChainSyncService;
pub use config::SyncConfig;
pub use domain::{
    candidates_for, check_linkage, target_height, PeerHeight, SyncError, SyncOutcome, SyncReport,
    SyncStats,
};
pub use ports::{SyncApi, SyncLedger};
