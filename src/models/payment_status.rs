//! Normalized payment status.
//!
//! The gateway reports a raw lifecycle string; callers get a stable record
//! with the amount back in major units and three derived flags. The record
//! is recomputed from a fresh retrieval on every check and never cached.

use serde::Serialize;

use crate::models::gateway::{Metadata, Resource};
use crate::models::money::to_major_units;
use crate::models::payment_intent::PaymentIntentAttributes;

/// Payment intent lifecycle as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentIntentStatus {
    AwaitingPaymentMethod,
    AwaitingNextAction,
    Processing,
    Succeeded,
    Failed,
    Cancelled,
    /// Anything the gateway adds later
    Unknown,
}

impl PaymentIntentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "awaiting_payment_method" => Self::AwaitingPaymentMethod,
            "awaiting_next_action" => Self::AwaitingNextAction,
            "processing" => Self::Processing,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    pub fn is_successful(self) -> bool {
        self == Self::Succeeded
    }

    pub fn is_pending(self) -> bool {
        matches!(
            self,
            Self::AwaitingPaymentMethod | Self::AwaitingNextAction | Self::Processing
        )
    }

    pub fn is_failed(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

/// Read-only projection of a retrieved payment intent.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "pi_123",
///   "status": "succeeded",
///   "amount": 250.0,
///   "currency": "PHP",
///   "paymentMethod": ["gcash"],
///   "isSuccessful": true,
///   "isPending": false,
///   "isFailed": false,
///   "lastUpdated": 1735689600,
///   "metadata": {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRecord {
    pub id: String,
    pub status: String,
    /// Major units
    pub amount: f64,
    pub currency: String,
    #[serde(rename = "paymentMethod")]
    pub payment_methods: Vec<String>,
    pub is_successful: bool,
    pub is_pending: bool,
    pub is_failed: bool,
    pub last_updated: Option<i64>,
    pub metadata: Metadata,
}

impl PaymentStatusRecord {
    /// A payment counts as valid only when it succeeded and is not failed.
    pub fn is_valid_payment(&self) -> bool {
        self.is_successful && !self.is_failed
    }
}

impl From<Resource<PaymentIntentAttributes>> for PaymentStatusRecord {
    fn from(intent: Resource<PaymentIntentAttributes>) -> Self {
        let attributes = intent.attributes;
        let status = PaymentIntentStatus::parse(&attributes.status);

        Self {
            id: intent.id,
            amount: to_major_units(attributes.amount),
            currency: attributes.currency,
            payment_methods: attributes.payment_method_allowed,
            is_successful: status.is_successful(),
            is_pending: status.is_pending(),
            is_failed: status.is_failed(),
            last_updated: attributes.updated_at,
            metadata: attributes.metadata.unwrap_or_default(),
            status: attributes.status,
        }
    }
}

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Info,
    Warning,
    Error,
}

/// User-facing description of a raw status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub message: &'static str,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

pub fn status_message(raw_status: &str) -> StatusMessage {
    let (message, kind) = match raw_status {
        "succeeded" => ("Payment successful", MessageKind::Success),
        "awaiting_payment_method" => ("Waiting for payment method", MessageKind::Info),
        "awaiting_next_action" => ("Additional action required", MessageKind::Info),
        "processing" => ("Payment processing", MessageKind::Info),
        "failed" => ("Payment failed", MessageKind::Error),
        "cancelled" => ("Payment cancelled", MessageKind::Warning),
        _ => ("Unknown payment status", MessageKind::Warning),
    };
    StatusMessage { message, kind }
}
