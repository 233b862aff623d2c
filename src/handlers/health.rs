//! Health check, root and fallback endpoints.

use axum::{Json, extract::State, http::StatusCode, http::Uri};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Whether a gateway secret key is configured ("configured" / "missing")
    pub gateway: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// The gateway itself is not contacted; a missing secret key is reported since
/// every payment call would be rejected without it.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "gateway": "configured",
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, gateway) = if state.config.has_secret_key() {
        ("healthy", "configured")
    } else {
        ("degraded", "missing")
    };

    Json(HealthResponse {
        status: status.to_string(),
        gateway: gateway.to_string(),
        timestamp: Utc::now(),
    })
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Server is running!",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": "Endpoint not found",
            "path": uri.path()
        })),
    )
}
