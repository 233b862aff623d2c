//! DishCraft payment service library.
//!
//! The payment core (`services`, `models`, `error`) is usable on its own; the
//! HTTP layer (`handlers`, `routes`, `state`) wraps it for the binary.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
