//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts wrap `rust_decimal::Decimal`; floats from backend JSON are
//! decoded straight into `Decimal`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AppError, AppResult};

/// ISO 4217 style currency code, three upper-case ASCII letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode([u8; 3]);

/// Display metadata for a catalogued currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    /// Symbol used when rendering prices.
    pub symbol: &'static str,
    /// Human readable name.
    pub name: &'static str,
}

const CATALOGUE: &[(&str, &str, &str)] = &[
    ("USD", "$", "US Dollar"),
    ("INR", "₹", "Indian Rupee"),
    ("EUR", "€", "Euro"),
    ("GBP", "£", "British Pound"),
    ("JPY", "¥", "Japanese Yen"),
    ("AED", "AED", "UAE Dirham"),
    ("SGD", "S$", "Singapore Dollar"),
    ("IDR", "Rp", "Indonesian Rupiah"),
    ("AUD", "A$", "Australian Dollar"),
    ("CAD", "CA$", "Canadian Dollar"),
];

impl CurrencyCode {
    /// US Dollar.
    pub const USD: Self = Self(*b"USD");
    /// Indian Rupee.
    pub const INR: Self = Self(*b"INR");
    /// Euro.
    pub const EUR: Self = Self(*b"EUR");

    /// Parses a currency code, accepting any letter case.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` unless the input is exactly three
    /// ASCII letters.
    pub fn parse(code: &str) -> AppResult<Self> {
        let bytes = code.trim().as_bytes();
        match bytes {
            [a, b, c] if bytes.iter().all(u8::is_ascii_alphabetic) => Ok(Self([
                a.to_ascii_uppercase(),
                b.to_ascii_uppercase(),
                c.to_ascii_uppercase(),
            ])),
            _ => Err(AppError::Validation(format!("Invalid currency code: {code}"))),
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Constructed only from ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }

    /// Returns display metadata from the built-in catalogue, if known.
    #[must_use]
    pub fn info(&self) -> Option<CurrencyInfo> {
        CATALOGUE
            .iter()
            .find(|(code, _, _)| *code == self.as_str())
            .map(|&(_, symbol, name)| CurrencyInfo { symbol, name })
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g. dollars, rupees).
    pub amount: Decimal,
    /// Currency the amount is denominated in.
    pub currency: CurrencyCode,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("USD", "USD")]
    #[case("inr", "INR")]
    #[case(" eur ", "EUR")]
    #[case("Chf", "CHF")]
    fn test_currency_parse_normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(CurrencyCode::parse(input).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("US")]
    #[case("USDT")]
    #[case("U$D")]
    #[case("12A")]
    fn test_currency_parse_rejects(#[case] input: &str) {
        let err = CurrencyCode::parse(input).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_currency_info_catalogue() {
        let info = CurrencyCode::INR.info().unwrap();
        assert_eq!(info.symbol, "₹");
        assert_eq!(info.name, "Indian Rupee");

        assert!(CurrencyCode::parse("CHF").unwrap().info().is_none());
    }

    #[test]
    fn test_currency_serde() {
        assert_eq!(serde_json::to_string(&CurrencyCode::USD).unwrap(), "\"USD\"");
        let code: CurrencyCode = serde_json::from_str("\"inr\"").unwrap();
        assert_eq!(code, CurrencyCode::INR);
        assert!(serde_json::from_str::<CurrencyCode>("\"RUPEE\"").is_err());
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(CurrencyCode::from_str("usd").unwrap(), CurrencyCode::USD);
        assert!(CurrencyCode::from_str("XXXX").is_err());
    }

    #[test]
    fn test_money_new() {
        let amount = dec!(100.00);
        let money = Money::new(amount, CurrencyCode::USD);
        assert_eq!(money.amount, amount);
        assert_eq!(money.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(CurrencyCode::INR);
        assert!(money.is_zero());
        assert_eq!(money.amount, Decimal::ZERO);
        assert_eq!(money.currency, CurrencyCode::INR);
    }
}
