//! Input validation for gateway operations.
//!
//! Every check here runs synchronously before a request is built, so invalid
//! input never produces a network call.

use std::collections::HashMap;

use crate::error::PaymentError;
use crate::models::money::Currency;

/// Per-currency minimum amounts, in major units.
///
/// The default table only knows the gateway's PHP minimum of 100.
#[derive(Debug, Clone)]
pub struct AmountRules {
    minimums: HashMap<String, f64>,
}

impl Default for AmountRules {
    fn default() -> Self {
        Self::empty().with_minimum("PHP", 100.0)
    }
}

impl AmountRules {
    /// A table with no currency minimums.
    pub fn empty() -> Self {
        Self {
            minimums: HashMap::new(),
        }
    }

    pub fn with_minimum(mut self, currency: &str, minimum: f64) -> Self {
        self.minimums.insert(currency.to_string(), minimum);
        self
    }

    pub fn minimum_for(&self, currency: &str) -> Option<f64> {
        self.minimums.get(currency).copied()
    }

    /// Validate an amount against this table.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` when the amount is not finite, not positive, or below
    /// the minimum registered for `currency`.
    pub fn validate(&self, amount: f64, currency: &str) -> Result<(), PaymentError> {
        if !amount.is_finite() {
            return Err(PaymentError::InvalidAmount(
                "Amount must be a valid number".to_string(),
            ));
        }

        if amount <= 0.0 {
            return Err(PaymentError::InvalidAmount(
                "Amount must be greater than zero".to_string(),
            ));
        }

        if let Some(minimum) = self.minimum_for(currency) {
            if amount < minimum {
                return Err(PaymentError::InvalidAmount(format!(
                    "Minimum amount for {} currency is {}",
                    currency, minimum
                )));
            }
        }

        Ok(())
    }
}

/// Validate an amount using the default rule table.
pub fn validate_amount(amount: f64, currency: &str) -> Result<(), PaymentError> {
    AmountRules::default().validate(amount, currency)
}

pub fn validate_currency(currency: &str) -> Result<Currency, PaymentError> {
    Currency::parse(currency)
}

pub fn validate_method_types(types: &[String]) -> Result<(), PaymentError> {
    if types.is_empty() || types.iter().any(|t| t.trim().is_empty()) {
        return Err(PaymentError::InvalidArgument(
            "Payment method types must be a non-empty array".to_string(),
        ));
    }
    Ok(())
}

/// Reject a blank identifier, naming it in the error.
pub fn require_id<'a>(value: &'a str, what: &str) -> Result<&'a str, PaymentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PaymentError::InvalidArgument(format!("{} is required", what)));
    }
    Ok(trimmed)
}

/// Validate a gateway resource id (`pi_...`, `pm_...`) before it is used
/// as a URL path segment.
///
/// # Errors
///
/// `InvalidArgument` when the id is blank or contains anything other than
/// ASCII letters, digits and `_`.
pub fn validate_gateway_id<'a>(value: &'a str, what: &str) -> Result<&'a str, PaymentError> {
    let id = require_id(value, what)?;
    if !id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(PaymentError::InvalidArgument(format!(
            "{} contains invalid characters",
            what
        )));
    }
    Ok(id)
}
