//! DishCraft Payments - Main Application Entry Point
//!
//! This is the payment service behind the DishCraft recipe-sharing app. It exposes a small REST API that turns payment requests into authenticated, idempotent, retried calls against the PayMongo gateway.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Gateway Client**: reqwest with Basic auth and `Idempotency-Key` headers
//! - **Retries**: linear backoff on network failures and 5xx responses
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load and validate configuration from environment variables
//! 2. Build the gateway client from that configuration
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

use std::net::SocketAddr;

use dishcraft_payments::{config, routes, services::paymongo::PaymongoClient, state::AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    config.validate()?;
    tracing::info!("Configuration loaded");

    if !config.has_secret_key() {
        tracing::warn!("PAYMONGO_SECRET_KEY is not set; gateway calls will be unauthenticated");
    }

    // Create the gateway client once and share it through state
    let payments = PaymongoClient::new(&config)?;
    tracing::info!(
        api_base = %config.paymongo_api_base,
        max_retries = config.paymongo_max_retries,
        "Payment gateway client ready"
    );

    let port = config.port;
    let app = routes::router(AppState::new(config, payments));

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Peer addresses are recorded in payment metadata
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
