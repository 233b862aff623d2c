//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::services::paymongo::PaymongoClient;

#[derive(Debug, Clone)]
pub struct AppState {
    pub payments: PaymongoClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, payments: PaymongoClient) -> Self {
        Self {
            payments,
            config: Arc::new(config),
        }
    }
}
