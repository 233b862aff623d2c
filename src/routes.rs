//! HTTP router assembly.

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, state::AppState};

/// Build the application router.
///
/// - `/api/payments/*`: payment gateway operations
/// - `/` and `/health`: liveness
/// - anything else: JSON 404
pub fn router(state: AppState) -> Router {
    let payment_routes = Router::new()
        .route("/intent", post(handlers::payments::create_intent))
        .route(
            "/{paymentId}/status",
            get(handlers::payments::get_payment_status),
        )
        .route(
            "/{paymentId}/attach",
            post(handlers::payments::attach_method),
        )
        .route("/source", post(handlers::payments::create_source));

    let cors = cors_layer(&state.config.frontend_url);

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .nest("/api/payments", payment_routes)
        .fallback(handlers::health::not_found)
        .layer(cors)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!("FRONTEND_URL is not a valid origin, CORS disabled");
            layer
        }
    }
}
