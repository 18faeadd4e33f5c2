//! Payment signature verification.
//!
//! After checkout the payment gateway hands the browser three values:
//! the order id, the payment id, and a signature. The signature is
//! `hex(HMAC-SHA256(key_secret, order_id + "|" + payment_id))`, and the
//! payment is genuine iff our recomputation matches it exactly.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;

use crate::CoreError;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded SHA-256 MAC.
const SIGNATURE_HEX_LEN: usize = 64;

/// The values returned by the checkout widget after a successful payment.
///
/// Field names follow the gateway's callback payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    #[serde(default)]
    pub razorpay_order_id: String,

    #[serde(default)]
    pub razorpay_payment_id: String,

    #[serde(default)]
    pub razorpay_signature: String,
}

impl PaymentConfirmation {
    pub fn new(
        order_id: impl Into<String>,
        payment_id: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            razorpay_order_id: order_id.into(),
            razorpay_payment_id: payment_id.into(),
            razorpay_signature: signature.into(),
        }
    }
}

/// Recomputes and checks payment signatures against a shared secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: SecretString,
}

impl SignatureVerifier {
    /// Create a verifier bound to the gateway key secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
        }
    }

    fn mac(&self, order_id: &str, payment_id: &str) -> Result<HmacSha256, CoreError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| CoreError::Signature(e.to_string()))?;
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        Ok(mac)
    }

    /// The lowercase hex signature the gateway should have produced.
    pub fn expected_signature(&self, order_id: &str, payment_id: &str) -> Result<String, CoreError> {
        let mac = self.mac(order_id, payment_id)?;
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Check a confirmation.
    ///
    /// Returns true iff the supplied signature is exactly the expected
    /// lowercase hex string. MAC bytes are compared in constant time.
    pub fn verify(&self, confirmation: &PaymentConfirmation) -> bool {
        let supplied = confirmation.razorpay_signature.as_str();
        if !is_lower_hex(supplied) {
            return false;
        }

        let Ok(supplied_bytes) = hex::decode(supplied) else {
            return false;
        };

        match self.mac(
            &confirmation.razorpay_order_id,
            &confirmation.razorpay_payment_id,
        ) {
            Ok(mac) => mac.verify_slice(&supplied_bytes).is_ok(),
            Err(e) => {
                tracing::error!(error = %e, "Signature MAC could not be initialised");
                false
            }
        }
    }
}

fn is_lower_hex(value: &str) -> bool {
    value.len() == SIGNATURE_HEX_LEN
        && value
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
