//! # Ember-Chain Test Suite
//!
//! Cross-component scenarios that no single crate can cover on its own.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── chain_flow.rs    # mined block → ledger → queries
//! │   ├── sync_flow.rs     # single-flight catch-up between two nodes
//! │   ├── gossip_flow.rs   # duplicate delivery, relay
//! │   └── network_flow.rs  # multi-node convergence
//! └── benches/             # criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ec-tests
//! cargo test -p ec-tests integration::sync_flow
//! cargo bench -p ec-tests
//! ```

pub mod integration;
