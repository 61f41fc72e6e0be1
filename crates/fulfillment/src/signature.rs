//! Payment-gateway webhook signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors raised by the signature verifier.
///
/// A mismatched signature is NOT an error: it is a normal negative
/// verification result. Only a missing secret (a deployment defect)
/// surfaces as an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The webhook signing secret is not configured.
    #[error("Payment webhook secret is not configured")]
    SecretNotConfigured,
}

/// Verifies that a payment confirmation genuinely originates from the
/// payment gateway.
///
/// The gateway signs `"{gateway_order_ref}|{payment_ref}"` with
/// HMAC-SHA256 under a shared secret and sends the hex-encoded digest
/// alongside the confirmation. Verification recomputes the digest and
/// compares in constant time.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    /// Creates a verifier with the given shared secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Checks a supplied signature against the recomputed one.
    ///
    /// Returns `Ok(false)` for any malformed or mismatching input (empty
    /// fields, undecodable hex, wrong digest); never errors on a mismatch.
    pub fn verify(
        &self,
        gateway_order_ref: &str,
        payment_ref: &str,
        signature: &str,
    ) -> Result<bool, SignatureError> {
        if gateway_order_ref.is_empty() || payment_ref.is_empty() || signature.is_empty() {
            return Ok(false);
        }

        let Ok(provided) = hex::decode(signature) else {
            return Ok(false);
        };

        let mut mac = self.mac()?;
        mac.update(gateway_order_ref.as_bytes());
        mac.update(b"|");
        mac.update(payment_ref.as_bytes());

        // verify_slice compares in constant time.
        Ok(mac.verify_slice(&provided).is_ok())
    }

    /// Computes the hex-encoded signature for the given references.
    ///
    /// This is the same scheme the gateway uses; exposed for tests and
    /// local tooling that need to produce valid confirmations.
    pub fn sign(&self, gateway_order_ref: &str, payment_ref: &str) -> Result<String, SignatureError> {
        let mut mac = self.mac()?;
        mac.update(gateway_order_ref.as_bytes());
        mac.update(b"|");
        mac.update(payment_ref.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn mac(&self) -> Result<HmacSha256, SignatureError> {
        if self.secret.is_empty() {
            return Err(SignatureError::SecretNotConfigured);
        }
        // HMAC accepts keys of any length, so this cannot fail for a
        // non-empty secret.
        HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| SignatureError::SecretNotConfigured)
    }
}
