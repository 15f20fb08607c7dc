//! Currency error types.

use rust_decimal::Decimal;
use storefront_shared::{AppError, CurrencyCode};
use thiserror::Error;

/// Errors raised while fetching rates or converting amounts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CurrencyError {
    /// The rate table for the active currency has not resolved yet.
    #[error("Exchange rates for {0} are still loading")]
    RatesLoading(CurrencyCode),

    /// The last rate fetch for the active currency failed.
    #[error("Exchange rates for {currency} are unavailable: {reason}")]
    RatesUnavailable {
        /// Active currency.
        currency: CurrencyCode,
        /// Failure reported by the rate source.
        reason: String,
    },

    /// The resolved rate table has no entry for the currency.
    #[error("No exchange rate for {0}")]
    MissingRate(CurrencyCode),

    /// The rate source returned a zero or negative multiplier.
    #[error("Invalid exchange rate {rate} for {currency}")]
    InvalidRate {
        /// Currency the bad multiplier belongs to.
        currency: CurrencyCode,
        /// Offending multiplier.
        rate: Decimal,
    },

    /// The converted amount does not fit in a `Decimal`.
    #[error("Converting {amount} at rate {rate} overflows")]
    Overflow {
        /// Base-currency amount.
        amount: Decimal,
        /// Multiplier applied.
        rate: Decimal,
    },

    /// The rate source could not be reached or answered badly.
    #[error("Rate fetch failed: {0}")]
    Fetch(String),
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::RatesLoading(_)
            | CurrencyError::RatesUnavailable { .. }
            | CurrencyError::Fetch(_) => Self::ExternalService(err.to_string()),
            CurrencyError::MissingRate(_) => Self::NotFound(err.to_string()),
            CurrencyError::Overflow { .. } => Self::Validation(err.to_string()),
            CurrencyError::InvalidRate { .. } => Self::Internal(err.to_string()),
        }
    }
}
