//! Idempotency keys and authenticated request headers.
//!
//! One key is generated per logical operation and reused on every retry of
//! it, so the gateway collapses retried attempts into a single charge.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use rand::Rng;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::error::PaymentError;

pub const IDEMPOTENCY_KEY_HEADER: HeaderName = HeaderName::from_static("idempotency-key");

/// Semantic prefixes for the mutating operations.
pub mod scope {
    pub const PAYMENT_INTENT: &str = "payment_intent";
    pub const ATTACH_METHOD: &str = "attach_method";
    pub const PAYMENT_SOURCE: &str = "payment_source";
}

/// Generate a key of the form `<prefix>_<unix millis>_<16 hex chars>`.
///
/// # Output
///
/// The random suffix carries 64 bits of entropy.
pub fn generate_idempotency_key(prefix: &str) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let suffix: [u8; 8] = rand::random();
    format!("{}_{}_{}", prefix, timestamp, hex::encode(suffix))
}

/// Generate a human-friendly tracking reference like `PAY-M5X2K1AB-7QZ0LC`.
pub fn generate_tracking_id(prefix: &str) -> String {
    let timestamp = to_base36(Utc::now().timestamp_millis().unsigned_abs());
    let mut rng = rand::rng();
    let random: String = (0..6)
        .map(|_| {
            let digit = rng.random_range(0..36u32);
            char::from_digit(digit, 36).unwrap_or('0')
        })
        .collect();
    format!("{}-{}-{}", prefix, timestamp, random).to_uppercase()
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let digit = (value % 36) as u32;
        digits.push(char::from_digit(digit, 36).unwrap_or('0'));
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// `Basic base64("<secret>:")`, the gateway's key-as-username scheme.
pub fn basic_auth_value(secret_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:", secret_key)))
}

/// Build the headers for one gateway request.
///
/// # Headers Sent
///
/// - `Content-Type: application/json`
/// - `Authorization: Basic <base64(secret:)>` when a secret key is configured
/// - `Idempotency-Key: <key>` when one is given (all mutating calls)
pub fn build_headers(
    secret_key: Option<&str>,
    idempotency_key: Option<&str>,
) -> Result<HeaderMap, PaymentError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(secret) = secret_key.filter(|s| !s.is_empty()) {
        let value = HeaderValue::from_str(&basic_auth_value(secret)).map_err(|_| {
            PaymentError::InvalidArgument("Secret key contains invalid characters".to_string())
        })?;
        headers.insert(AUTHORIZATION, value);
    }

    if let Some(key) = idempotency_key {
        let value = HeaderValue::from_str(key).map_err(|_| {
            PaymentError::InvalidArgument("Idempotency key contains invalid characters".to_string())
        })?;
        headers.insert(IDEMPOTENCY_KEY_HEADER, value);
    }

    Ok(headers)
}
