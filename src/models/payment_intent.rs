//! Payment intent records and the request bodies that create or mutate them.
//!
//! A payment intent is the gateway-side record of one attempted charge. Its
//! canonical copy lives in the gateway; these types are only the wire shapes.

use serde::{Deserialize, Serialize};

use crate::models::gateway::{Envelope, Metadata};

/// Gateway response for any payment intent endpoint.
pub type PaymentIntent = Envelope<PaymentIntentAttributes>;

/// Attributes of a payment intent as returned by the gateway.
///
/// # JSON Example
///
/// ```json
/// {
///   "amount": 25000,
///   "currency": "PHP",
///   "status": "awaiting_payment_method",
///   "payment_method_allowed": ["gcash", "card"],
///   "metadata": {"user_id": "guest"},
///   "created_at": 1735689600,
///   "updated_at": 1735689600
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntentAttributes {
    /// Amount in minor units (centavos)
    pub amount: i64,

    pub currency: String,

    /// Raw lifecycle status, see `PaymentIntentStatus`
    pub status: String,

    #[serde(default)]
    pub payment_method_allowed: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Publishable key the frontend uses to attach a method client-side
    #[serde(default)]
    pub client_key: Option<String>,

    /// Present while the intent waits on a redirect (3DS, e-wallet approval)
    #[serde(default)]
    pub next_action: Option<NextAction>,

    #[serde(default)]
    pub metadata: Option<Metadata>,

    /// Unix seconds
    #[serde(default)]
    pub created_at: Option<i64>,

    /// Unix seconds
    #[serde(default)]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextAction {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub redirect: Option<NextActionRedirect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextActionRedirect {
    pub url: String,

    #[serde(default)]
    pub return_url: Option<String>,
}

/// Body attributes for `POST /payment_intents`.
#[derive(Debug, Serialize)]
pub struct CreatePaymentIntentAttributes {
    pub amount: i64,
    pub currency: String,
    pub payment_method_allowed: Vec<String>,
    pub payment_method_options: PaymentMethodOptions,
    pub metadata: Metadata,
}

/// Per-method options; always sent empty.
#[derive(Debug, Default, Serialize)]
pub struct PaymentMethodOptions {}

/// Body attributes for `POST /payment_intents/{id}/attach`.
#[derive(Debug, Serialize)]
pub struct AttachPaymentMethodAttributes {
    pub payment_method: String,
    pub return_url: String,
}

/// Caller context injected into intent metadata alongside the caller's own keys.
#[derive(Debug, Clone, Default)]
pub struct CallerContext {
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
}
