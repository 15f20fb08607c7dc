//! Rate source port.

use async_trait::async_trait;
use storefront_shared::CurrencyCode;

use super::error::CurrencyError;
use super::rates::RateTable;

/// Fetches exchange rate tables from the storefront backend.
///
/// Requests are keyed by the currency the shopper selected; the answer is
/// the full table of multipliers relative to the base currency.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the rate table for `currency`.
    async fn fetch_rates(&self, currency: &CurrencyCode) -> Result<RateTable, CurrencyError>;
}
