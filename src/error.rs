//! Error types and HTTP error response handling.
//!
//! This module defines the payment core's typed failures and how they are
//! converted into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Failures raised by the payment gateway client.
///
/// # Error Categories
///
/// - **Validation Errors**: `InvalidArgument`, `InvalidAmount`, raised before any network call
/// - **Gateway Errors**: `GatewayClient` (4xx), `GatewayServer` (5xx or unreachable)
/// - **Decoding Errors**: `InvalidResponse`, a successful response with an unexpected body
/// - **Resource Errors**: `NotFound`, a retrieval that returned no intent
///
/// Only `GatewayServer` is ever retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaymentError {
    /// Malformed or missing required input (currency, ids, method types).
    #[error("{0}")]
    InvalidArgument(String),

    /// Amount is not a positive finite number, or is below the currency minimum.
    #[error("{0}")]
    InvalidAmount(String),

    /// Gateway rejected the request with a 4xx response.
    #[error("{message}")]
    GatewayClient {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Gateway answered with a 5xx response, or could not be reached at all.
    ///
    /// `status` is `None` for connection, DNS and timeout failures.
    #[error("{message}")]
    GatewayServer { status: Option<u16>, message: String },

    /// Gateway answered 2xx with a body that does not match the expected schema.
    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),

    /// Retrieval succeeded but carried no payment intent.
    #[error("Payment intent not found")]
    NotFound,
}

impl PaymentError {
    /// Whether another attempt may succeed: no server response, or a 5xx one.
    pub fn is_transient(&self) -> bool {
        matches!(self, PaymentError::GatewayServer { .. })
    }

    /// Classify a transport-level failure from reqwest.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        PaymentError::GatewayServer {
            status: err.status().map(|s| s.as_u16()),
            message: format!("Gateway request failed: {}", err),
        }
    }

    /// Stable machine-readable code used in error response bodies.
    pub fn code(&self) -> String {
        match self {
            PaymentError::InvalidArgument(_) => "invalid_argument".to_string(),
            PaymentError::InvalidAmount(_) => "invalid_amount".to_string(),
            PaymentError::GatewayClient { code, .. } => code
                .clone()
                .unwrap_or_else(|| "gateway_client_error".to_string()),
            PaymentError::GatewayServer { .. } => "gateway_unavailable".to_string(),
            PaymentError::InvalidResponse(_) => "gateway_invalid_response".to_string(),
            PaymentError::NotFound => "payment_not_found".to_string(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PaymentError::InvalidArgument(_) | PaymentError::InvalidAmount(_) => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::GatewayClient { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            PaymentError::GatewayServer { .. } | PaymentError::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            PaymentError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Application-wide error type returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// A payment gateway operation failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Malformed or mistyped JSON bodies get the same envelope as other bad requests.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "status": "error",
///   "message": "Human-readable error message",
///   "code": "error_type"
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidRequest`, `InvalidArgument`, `InvalidAmount` → 400 Bad Request
/// - `GatewayClient` → the status the gateway returned
/// - `GatewayServer`, `InvalidResponse` → 502 Bad Gateway
/// - `NotFound` → 404 Not Found
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_request".to_string(),
                msg.clone(),
            ),
            AppError::Payment(err) => (err.status_code(), err.code(), err.to_string()),
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
            "code": code
        }));

        (status, body).into_response()
    }
}
