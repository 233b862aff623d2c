//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.
//! The resulting `Config` is built once in `main` and handed by reference to the
//! payment gateway client, so nothing reads the environment at request time.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `PAYMONGO_SECRET_KEY` (optional): gateway secret key used for HTTP Basic auth
/// - `PAYMONGO_API_BASE` (optional): gateway base URL, defaults to `https://api.paymongo.com/v1`
/// - `PAYMENT_RETURN_URL` (optional): return URL sent when attaching a payment method
/// - `PAYMENT_SUCCESS_URL` / `PAYMENT_FAILED_URL` (optional): default source redirects
/// - `PAYMONGO_MAX_RETRIES` (optional): retries after the first attempt, defaults to 3
/// - `PAYMONGO_RETRY_DELAY_MS` (optional): base backoff delay, defaults to 1000
/// - `FRONTEND_URL` (optional): allowed CORS origin, defaults to `http://localhost:5173`
/// - `PORT` (optional): HTTP server port, defaults to 5000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paymongo_secret_key: Option<String>,

    #[serde(default = "default_api_base")]
    pub paymongo_api_base: String,

    #[serde(default = "default_return_url")]
    pub payment_return_url: String,

    #[serde(default)]
    pub payment_success_url: Option<String>,

    #[serde(default)]
    pub payment_failed_url: Option<String>,

    #[serde(default = "default_max_retries")]
    pub paymongo_max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub paymongo_retry_delay_ms: u64,

    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_api_base() -> String {
    "https://api.paymongo.com/v1".to_string()
}

fn default_return_url() -> String {
    "https://your-website.com/payment/success".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

/// Default port if PORT environment variable is not set.
fn default_port() -> u16 {
    5000
}

/// Configuration is well-formed but points somewhere unusable.
#[derive(Debug, thiserror::Error)]
#[error("Invalid configuration: {field} is not a valid URL ({value})")]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into expected types.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: paymongo_api_base -> PAYMONGO_API_BASE
        envy::from_env::<Config>()
    }

    /// Check that every configured URL parses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("PAYMONGO_API_BASE", Some(&self.paymongo_api_base)),
            ("PAYMENT_RETURN_URL", Some(&self.payment_return_url)),
            ("PAYMENT_SUCCESS_URL", self.payment_success_url.as_ref()),
            ("PAYMENT_FAILED_URL", self.payment_failed_url.as_ref()),
            ("FRONTEND_URL", Some(&self.frontend_url)),
        ];

        for (field, value) in required {
            if let Some(value) = value {
                url::Url::parse(value).map_err(|_| ConfigError {
                    field,
                    value: value.clone(),
                })?;
            }
        }

        Ok(())
    }

    /// Whether a gateway secret key is present. Without one every gateway call
    /// goes out unauthenticated and will be rejected upstream.
    pub fn has_secret_key(&self) -> bool {
        self.paymongo_secret_key
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }
}

#[cfg(test)]
pub(crate) fn test_config(api_base: &str) -> Config {
    Config {
        paymongo_secret_key: Some("sk_test_123".to_string()),
        paymongo_api_base: api_base.to_string(),
        payment_return_url: default_return_url(),
        payment_success_url: Some("https://dishcraft.test/payment/success".to_string()),
        payment_failed_url: Some("https://dishcraft.test/payment/failed".to_string()),
        paymongo_max_retries: 3,
        paymongo_retry_delay_ms: 0,
        frontend_url: default_frontend_url(),
        port: default_port(),
    }
}
