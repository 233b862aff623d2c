//! Money amounts and currency codes.
//!
//! Callers work in the currency's major unit (pesos); the gateway only ever
//! sees minor units (centavos) as integers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PaymentError;

/// Three-letter uppercase ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Parse a currency code.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` unless the code is exactly three ASCII uppercase letters.
    pub fn parse(code: &str) -> Result<Self, PaymentError> {
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code.to_string()))
        } else {
            Err(PaymentError::InvalidArgument(
                "Currency must be a valid three-letter ISO currency code".to_string(),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Currency {
    type Error = PaymentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::parse(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convert a major-unit amount to minor units, rounding to the nearest integer.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Convert minor units back to the major unit.
pub fn to_major_units(minor: i64) -> f64 {
    minor as f64 / 100.0
}

/// Format an amount for display, e.g. `₱1,234.50` or `USD 10.00`.
///
/// Always two fraction digits with comma thousands separators.
pub fn format_amount(amount: f64, currency: &str) -> String {
    let minor = to_minor_units(amount.abs());
    let whole = (minor / 100).to_string();
    let fraction = minor % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && minor != 0 { "-" } else { "" };
    match currency {
        "PHP" => format!("{}₱{}.{:02}", sign, grouped, fraction),
        other => format!("{}{} {}.{:02}", sign, other, grouped, fraction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PHP", true)]
    #[case("USD", true)]
    #[case("php", false)]
    #[case("PH", false)]
    #[case("PHPX", false)]
    #[case("P1P", false)]
    #[case("", false)]
    fn currency_codes(#[case] code: &str, #[case] valid: bool) {
        assert_eq!(Currency::parse(code).is_ok(), valid);
    }

    #[test]
    fn minor_unit_conversion_rounds_to_nearest() {
        assert_eq!(to_minor_units(250.0), 25_000);
        assert_eq!(to_minor_units(19.99), 1_999);
        assert_eq!(to_major_units(25_000), 250.0);
        assert_eq!(to_major_units(to_minor_units(123.45)), 123.45);
    }

    #[rstest]
    #[case(1234.5, "PHP", "₱1,234.50")]
    #[case(100.0, "PHP", "₱100.00")]
    #[case(1_000_000.0, "PHP", "₱1,000,000.00")]
    #[case(10.0, "USD", "USD 10.00")]
    #[case(0.5, "PHP", "₱0.50")]
    fn formats_amounts(#[case] amount: f64, #[case] currency: &str, #[case] expected: &str) {
        assert_eq!(format_amount(amount, currency), expected);
    }

    #[test]
    fn currency_deserializes_with_validation() {
        let ok: Currency = serde_json::from_str("\"PHP\"").unwrap();
        assert_eq!(ok.as_str(), "PHP");
        assert!(serde_json::from_str::<Currency>("\"peso\"").is_err());
    }
}
