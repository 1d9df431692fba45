//! Signature verifier adapters.

use crate::ports::SignatureVerifier;
use shared_crypto::verify_identity_signature;
use shared_types::Transaction;
use tracing::debug;

/// Ed25519 verifier: `from` is the hex public key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519SignatureVerifier;

impl SignatureVerifier for Ed25519SignatureVerifier {
    fn verify(&self, tx: &Transaction) -> bool {
        match verify_identity_signature(&tx.from, &tx.signing_payload(), &tx.signature) {
            Ok(()) => true,
            Err(e) => {
                debug!("[ledger] Signature rejected for {}: {}", tx.from, e);
                false
            }
        }
    }
}

/// Accepts every signature. For tests and local demos only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllSignatures;

impl SignatureVerifier for AcceptAllSignatures {
    fn verify(&self, _tx: &Transaction) -> bool {
        true
    }
}
