//! Currency service for conversion arithmetic.
//!
//! This module provides conversion of base-currency amounts with Banker's
//! Rounding and lookup of the multiplier in a resolved rate table.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use storefront_shared::{CurrencyCode, Money};

use super::error::CurrencyError;
use super::rates::RateTable;

/// Decimal places kept on converted amounts before display rounding.
pub const CONVERSION_DECIMAL_PLACES: u32 = 4;

/// Currency service for conversion operations.
///
/// Provides methods for converting amounts between currencies using
/// Banker's Rounding (MidpointNearestEven) strategy.
pub struct CurrencyService;

impl CurrencyService {
    /// Convert amount using exchange rate with Banker's Rounding.
    ///
    /// Uses `RoundingStrategy::MidpointNearestEven` (Banker's Rounding) which:
    /// - Rounds 2.5 → 2 (to nearest even)
    /// - Rounds 3.5 → 4 (to nearest even)
    ///
    /// # Arguments
    ///
    /// * `amount` - The base-currency amount to convert
    /// * `rate` - The exchange rate (1 base = rate target)
    ///
    /// # Returns
    ///
    /// The converted amount rounded to 4 decimal places using Banker's Rounding.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::Overflow` if the product does not fit in a
    /// `Decimal`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use storefront_core::currency::CurrencyService;
    ///
    /// let result = CurrencyService::convert(dec!(100), dec!(83.1)).unwrap();
    /// assert_eq!(result, dec!(8310.0000));
    /// ```
    pub fn convert(amount: Decimal, rate: Decimal) -> Result<Decimal, CurrencyError> {
        let product = amount
            .checked_mul(rate)
            .ok_or(CurrencyError::Overflow { amount, rate })?;
        Ok(Self::round(product, CONVERSION_DECIMAL_PLACES))
    }

    /// Round a decimal value using Banker's Rounding.
    #[must_use]
    pub fn round(value: Decimal, decimal_places: u32) -> Decimal {
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
    }

    /// Convert a base-currency amount into `target` using a resolved table.
    ///
    /// Converting into the table's base currency returns the amount untouched.
    ///
    /// # Errors
    ///
    /// - `CurrencyError::MissingRate` if the table has no multiplier for `target`
    /// - `CurrencyError::Overflow` if the converted amount is out of range
    pub fn convert_with_table(
        amount: Decimal,
        table: &RateTable,
        target: CurrencyCode,
    ) -> Result<Money, CurrencyError> {
        if target == table.base() {
            return Ok(Money::new(amount, target));
        }

        let rate = table
            .rate_for(&target)
            .ok_or(CurrencyError::MissingRate(target))?;

        Ok(Money::new(Self::convert(amount, rate)?, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn usd_table() -> RateTable {
        RateTable::new(
            CurrencyCode::USD,
            HashMap::from([(CurrencyCode::INR, dec!(83.1)), (CurrencyCode::EUR, dec!(0.92))]),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_convert_basic() {
        // 100 * 83.1 = 8310
        let result = CurrencyService::convert(dec!(100), dec!(83.1)).unwrap();
        assert_eq!(result, dec!(8310.0000));
    }

    #[test]
    fn test_convert_rounds_to_4_decimals() {
        // 100 * 1.23456789 = 123.456789 → rounds to 123.4568
        let result = CurrencyService::convert(dec!(100), dec!(1.23456789)).unwrap();
        assert_eq!(result, dec!(123.4568));
    }

    #[test]
    fn test_bankers_rounding_midpoint_to_even() {
        assert_eq!(CurrencyService::round(dec!(2.5), 0), dec!(2));
        assert_eq!(CurrencyService::round(dec!(3.5), 0), dec!(4));
        assert_eq!(CurrencyService::round(dec!(2.25), 1), dec!(2.2));
        assert_eq!(CurrencyService::round(dec!(2.35), 1), dec!(2.4));
    }

    #[test]
    fn test_convert_with_table() {
        let money = CurrencyService::convert_with_table(dec!(50), &usd_table(), CurrencyCode::EUR)
            .unwrap();
        assert_eq!(money.amount, dec!(46));
        assert_eq!(money.currency, CurrencyCode::EUR);
    }

    #[test]
    fn test_convert_with_table_base_is_identity() {
        let money =
            CurrencyService::convert_with_table(dec!(19.999), &usd_table(), CurrencyCode::USD)
                .unwrap();
        assert_eq!(money.amount, dec!(19.999));
        assert_eq!(money.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_convert_with_table_missing_rate() {
        let gbp = CurrencyCode::parse("GBP").unwrap();
        let err = CurrencyService::convert_with_table(dec!(1), &usd_table(), gbp).unwrap_err();
        assert_eq!(err, CurrencyError::MissingRate(gbp));
    }

    #[test]
    fn test_convert_overflow_is_an_error() {
        let err = CurrencyService::convert(Decimal::MAX, dec!(83.1)).unwrap_err();
        assert!(matches!(err, CurrencyError::Overflow { .. }));
    }

    #[test]
    fn test_convert_with_table_huge_amount() {
        let amount = Decimal::from_str_exact("1000000000000000000000000000").unwrap();
        let err = CurrencyService::convert_with_table(amount, &usd_table(), CurrencyCode::INR)
            .unwrap_err();
        assert_eq!(
            err,
            CurrencyError::Overflow {
                amount,
                rate: dec!(83.1)
            }
        );
    }
}
