//! Redirect-based payment sources (GCash, GrabPay and similar e-wallets).

use serde::{Deserialize, Serialize};

use crate::models::gateway::Envelope;

/// Gateway response for `POST /sources`.
pub type PaymentSource = Envelope<PaymentSourceAttributes>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSourceAttributes {
    /// Amount in minor units
    pub amount: i64,

    pub currency: String,

    #[serde(rename = "type")]
    pub source_type: String,

    #[serde(default)]
    pub status: Option<String>,

    pub redirect: SourceRedirect,

    #[serde(default)]
    pub created_at: Option<i64>,

    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// Redirect URLs of a source. `checkout_url` is only set by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRedirect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,

    #[serde(default)]
    pub success: Option<String>,

    #[serde(default)]
    pub failed: Option<String>,
}

/// Body attributes for `POST /sources`.
#[derive(Debug, Serialize)]
pub struct CreateSourceAttributes {
    pub amount: i64,
    pub currency: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub redirect: SourceRedirect,
}

/// Caller overrides for the source redirect URLs.
///
/// Any field left `None` falls back to the configured default.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub redirect_success: Option<String>,
    pub redirect_failed: Option<String>,
}
