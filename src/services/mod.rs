//! Business logic services.
//!
//! Services hold the payment core, separated from HTTP handlers: input
//! validation, idempotency keys, the retry policy and the gateway client.

pub mod idempotency;
pub mod paymongo;
pub mod retry;
pub mod validation;
