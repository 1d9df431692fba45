//! # Shared Crypto - Signature Primitives
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Transaction signing and verification |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency when signing
//! - Secret key material is zeroized on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod signatures;

pub use errors::CryptoError;
pub use signatures::{
    verify_identity_signature, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature,
};
