//! Payment HTTP handlers.
//!
//! This module implements the payment API endpoints:
//! - POST /api/payments/intent - Create a payment intent
//! - GET /api/payments/:paymentId/status - Normalized payment status
//! - POST /api/payments/:paymentId/attach - Attach a payment method
//! - POST /api/payments/source - Create a redirect-based payment source

use std::net::SocketAddr;

use axum::{
    Extension, Json,
    extract::{ConnectInfo, Path, State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    error::AppError,
    models::{
        gateway::Metadata,
        money::format_amount,
        payment_intent::{CallerContext, PaymentIntent},
        payment_source::{PaymentSource, SourceOptions},
        payment_status::{PaymentStatusRecord, StatusMessage, status_message},
    },
    services::idempotency::generate_tracking_id,
    state::AppState,
};

/// Header an upstream auth layer sets to identify the caller.
const USER_ID_HEADER: &str = "x-user-id";

/// Successful response envelope: `{"status": "success", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Json<Self> {
        Json(Self {
            status: "success",
            data,
        })
    }
}

/// Request to create a payment intent.
///
/// # JSON Example
///
/// ```json
/// {
///   "amount": 250,
///   "currency": "PHP",
///   "paymentMethodTypes": ["gcash", "card"],
///   "metadata": {"recipe_id": "r-17"}
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    pub amount: Option<f64>,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_method_types")]
    pub payment_method_types: Vec<String>,

    /// Scalar values are stored as strings; nested values as compact JSON.
    #[serde(default, deserialize_with = "metadata_as_strings")]
    pub metadata: Metadata,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachMethodRequest {
    pub payment_method_id: Option<String>,
}

/// Request to create a payment source.
///
/// # JSON Example
///
/// ```json
/// {
///   "amount": 500,
///   "type": "gcash",
///   "redirectSuccess": "https://dishcraft.app/pay/ok"
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSourceRequest {
    pub amount: Option<f64>,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(rename = "type")]
    pub source_type: Option<String>,

    pub redirect_success: Option<String>,
    pub redirect_failed: Option<String>,
}

fn metadata_as_strings<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Map<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(s) => s,
                other => other.to_string(),
            };
            Some((key, value))
        })
        .collect())
}

fn default_currency() -> String {
    "PHP".to_string()
}

fn default_method_types() -> Vec<String> {
    vec!["gcash".to_string(), "card".to_string()]
}

/// Display-oriented companion to a status record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    #[serde(flatten)]
    pub message: StatusMessage,
    pub formatted_amount: String,
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub status: &'static str,
    pub data: PaymentStatusRecord,
    pub summary: StatusSummary,
}

/// Absent and zero amounts both count as missing.
fn required_amount(amount: Option<f64>) -> Option<f64> {
    amount.filter(|a| *a != 0.0)
}

fn caller_context(
    headers: &HeaderMap,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
) -> CallerContext {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("guest")
        .to_string();

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());
    let ip_address =
        forwarded.or_else(|| connect_info.map(|Extension(ConnectInfo(addr))| addr.ip().to_string()));

    CallerContext {
        user_id: Some(user_id),
        ip_address,
    }
}

/// Create a payment intent.
///
/// # Response (200)
///
/// ```json
/// {
///   "status": "success",
///   "data": {"data": {"id": "pi_...", "type": "payment_intent", "attributes": {...}}}
/// }
/// ```
pub async fn create_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    request: Result<Json<CreateIntentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PaymentIntent>>, AppError> {
    let Json(request) = request?;
    let amount = required_amount(request.amount)
        .ok_or_else(|| AppError::InvalidRequest("Amount is required".to_string()))?;

    let caller = caller_context(&headers, connect_info);
    let mut metadata = request.metadata;
    metadata.insert("tracking_id".to_string(), generate_tracking_id("PAY"));

    let intent = state
        .payments
        .create_payment_intent(
            amount,
            &request.currency,
            &request.payment_method_types,
            metadata,
            caller,
        )
        .await
        .inspect_err(|e| tracing::error!("Payment intent creation failed: {}", e))?;

    Ok(ApiResponse::success(intent))
}

/// Get normalized payment status plus a user-facing summary.
pub async fn get_payment_status(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<PaymentStatusResponse>, AppError> {
    let record = state
        .payments
        .check_payment_status(&payment_id)
        .await
        .inspect_err(|e| tracing::error!("Payment status check failed: {}", e))?;

    let summary = StatusSummary {
        message: status_message(&record.status),
        formatted_amount: format_amount(record.amount, &record.currency),
        valid: record.is_valid_payment(),
    };

    Ok(Json(PaymentStatusResponse {
        status: "success",
        data: record,
        summary,
    }))
}

/// Attach a payment method to an intent.
pub async fn attach_method(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    request: Result<Json<AttachMethodRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PaymentIntent>>, AppError> {
    let Json(request) = request?;
    let payment_method_id = request
        .payment_method_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            AppError::InvalidRequest(
                "Payment ID and payment method ID are required".to_string(),
            )
        })?;

    let intent = state
        .payments
        .attach_payment_method(&payment_id, &payment_method_id)
        .await
        .inspect_err(|e| tracing::error!("Payment method attachment failed: {}", e))?;

    Ok(ApiResponse::success(intent))
}

/// Create a redirect-based payment source.
pub async fn create_source(
    State(state): State<AppState>,
    request: Result<Json<CreateSourceRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PaymentSource>>, AppError> {
    let Json(request) = request?;
    let (amount, source_type) = match (required_amount(request.amount), request.source_type) {
        (Some(amount), Some(source_type)) if !source_type.is_empty() => (amount, source_type),
        _ => {
            return Err(AppError::InvalidRequest(
                "Amount and payment type are required".to_string(),
            ));
        }
    };

    let options = SourceOptions {
        redirect_success: request.redirect_success,
        redirect_failed: request.redirect_failed,
    };

    let source = state
        .payments
        .create_payment_source(amount, &request.currency, &source_type, options)
        .await
        .inspect_err(|e| tracing::error!("Payment source creation failed: {}", e))?;

    Ok(ApiResponse::success(source))
}
