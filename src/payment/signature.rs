//! Razorpay payment signature verification.
//!
//! A checkout completes with an `(order_id, payment_id, signature)` triple.
//! The triple is authentic iff
//! `signature == hex(HMAC-SHA256(key_secret, order_id + "|" + payment_id))`.
//! The comparison is constant time so that a forger learns nothing from
//! response latency about how many leading characters matched.

use std::fmt;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use utoipa::ToSchema;

use super::error::PaymentError;
use crate::config::{ConfigError, Secret};

type HmacSha256 = Hmac<Sha256>;

/// Separator between order id and payment id in the signed message.
pub const FIELD_DELIMITER: &str = "|";

/// Body of `POST /verify`. Fields are optional so that a missing field is
/// reported as `InvalidRequest` instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct VerifyRequest {
    #[schema(example = "order_abc")]
    pub razorpay_order_id: Option<String>,
    #[schema(example = "pay_123")]
    pub razorpay_payment_id: Option<String>,
    #[schema(example = "070ea2f5813be979e4d4dd50f9840717bb01adf600c92662f401086c6cabbf9a")]
    pub razorpay_signature: Option<String>,
}

/// Body of a `POST /verify` reply.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub success: bool,
}

/// A claimed payment completion, validated for shape but not yet for authenticity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedOrderAssertion {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

impl SignedOrderAssertion {
    pub fn from_request(req: VerifyRequest) -> Result<Self, PaymentError> {
        Ok(Self {
            order_id: required("razorpay_order_id", req.razorpay_order_id)?,
            payment_id: required("razorpay_payment_id", req.razorpay_payment_id)?,
            signature: required("razorpay_signature", req.razorpay_signature)?,
        })
    }
}

fn required(name: &'static str, value: Option<String>) -> Result<String, PaymentError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PaymentError::MissingField(name)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authentic,
    Inauthentic,
}

/// Verifies signed order assertions against the gateway key secret.
///
/// Holds a keyed HMAC state; each verification clones it, so the secret
/// itself is not retained.
#[derive(Clone)]
pub struct OrderVerifier {
    keyed_mac: HmacSha256,
}

impl OrderVerifier {
    pub fn new(secret: &Secret) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::Invalid(
                "payment verification secret is empty".to_string(),
            ));
        }
        let keyed_mac = HmacSha256::new_from_slice(secret.expose().as_bytes())
            .map_err(|e| ConfigError::Invalid(format!("payment verification secret: {}", e)))?;
        Ok(Self { keyed_mac })
    }

    /// Lowercase hex HMAC-SHA256 of `order_id|payment_id`.
    pub fn expected_signature(&self, order_id: &str, payment_id: &str) -> String {
        let mut mac = self.keyed_mac.clone();
        mac.update(order_id.as_bytes());
        mac.update(FIELD_DELIMITER.as_bytes());
        mac.update(payment_id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    pub fn verify(&self, assertion: &SignedOrderAssertion) -> Verdict {
        let expected = self.expected_signature(&assertion.order_id, &assertion.payment_id);
        if constant_time_eq(expected.as_bytes(), assertion.signature.as_bytes()) {
            Verdict::Authentic
        } else {
            Verdict::Inauthentic
        }
    }
}

impl fmt::Debug for OrderVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderVerifier")
            .field("keyed_mac", &"[REDACTED]")
            .finish()
    }
}

/// Byte comparison whose running time does not depend on where the inputs differ.
/// Inputs of different length compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
