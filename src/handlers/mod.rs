//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Calls the payment gateway client
//! 3. Returns HTTP response (JSON, status code)

/// Liveness, root and fallback endpoints
pub mod health;
/// Payment intent and source endpoints
pub mod payments;
