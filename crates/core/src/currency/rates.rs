//! Exchange rate table keyed by currency code.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use storefront_shared::CurrencyCode;

use super::error::CurrencyError;

/// Multipliers from the base currency to every listed currency.
///
/// `amount_in_base * rate_for(code) = amount_in_code`. Every multiplier is
/// strictly positive and the base currency always maps to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    base: CurrencyCode,
    rates: HashMap<CurrencyCode, Decimal>,
    fetched_at: DateTime<Utc>,
}

impl RateTable {
    /// Builds a validated rate table.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::InvalidRate` if any multiplier is zero or
    /// negative. The whole table is rejected in that case.
    pub fn new(
        base: CurrencyCode,
        rates: HashMap<CurrencyCode, Decimal>,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, CurrencyError> {
        if let Some((&currency, &rate)) = rates.iter().find(|(_, rate)| **rate <= Decimal::ZERO) {
            return Err(CurrencyError::InvalidRate { currency, rate });
        }

        let mut rates = rates;
        rates.insert(base, Decimal::ONE);

        Ok(Self {
            base,
            rates,
            fetched_at,
        })
    }

    /// Table containing only the base currency.
    #[must_use]
    pub fn identity(base: CurrencyCode) -> Self {
        Self {
            base,
            rates: HashMap::from([(base, Decimal::ONE)]),
            fetched_at: Utc::now(),
        }
    }

    /// Multiplier for `code`, if listed.
    #[must_use]
    pub fn rate_for(&self, code: &CurrencyCode) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    /// Base currency of this table.
    #[must_use]
    pub const fn base(&self) -> CurrencyCode {
        self.base
    }

    /// When the table was fetched.
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// All listed multipliers.
    #[must_use]
    pub const fn rates(&self) -> &HashMap<CurrencyCode, Decimal> {
        &self.rates
    }

    /// Number of listed currencies, base included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Always false; the base currency is always listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_inserts_base() {
        let table = RateTable::new(
            CurrencyCode::USD,
            HashMap::from([(CurrencyCode::INR, dec!(83.1))]),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(table.rate_for(&CurrencyCode::USD), Some(Decimal::ONE));
        assert_eq!(table.rate_for(&CurrencyCode::INR), Some(dec!(83.1)));
        assert_eq!(table.rate_for(&CurrencyCode::EUR), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_new_overrides_bad_base_entry() {
        let table = RateTable::new(
            CurrencyCode::USD,
            HashMap::from([(CurrencyCode::USD, dec!(1.02))]),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(table.rate_for(&CurrencyCode::USD), Some(Decimal::ONE));
    }

    #[test]
    fn test_new_rejects_non_positive() {
        let err = RateTable::new(
            CurrencyCode::USD,
            HashMap::from([(CurrencyCode::INR, dec!(83.1)), (CurrencyCode::EUR, dec!(0))]),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CurrencyError::InvalidRate {
                currency: CurrencyCode::EUR,
                rate: dec!(0)
            }
        );

        assert!(
            RateTable::new(
                CurrencyCode::USD,
                HashMap::from([(CurrencyCode::INR, dec!(-1))]),
                Utc::now(),
            )
            .is_err()
        );
    }

    #[test]
    fn test_identity() {
        let table = RateTable::identity(CurrencyCode::EUR);
        assert_eq!(table.base(), CurrencyCode::EUR);
        assert_eq!(table.rate_for(&CurrencyCode::EUR), Some(Decimal::ONE));
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }
}
