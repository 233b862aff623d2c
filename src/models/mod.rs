//! Data models for the payment gateway.
//!
//! These types mirror the gateway's JSON:API style payloads and are decoded
//! at the HTTP boundary, so the rest of the crate never touches untyped JSON.

/// Shared envelope, resource and error body shapes
pub mod gateway;
/// Money amounts, currency codes and display formatting
pub mod money;
/// Payment intent records and request bodies
pub mod payment_intent;
/// Redirect-based payment sources
pub mod payment_source;
/// Normalized status projection and status messages
pub mod payment_status;
