//! Price display unit.
//!
//! Turns a base-currency amount into what the shopper sees: a formatted
//! price, a loading placeholder, or the fallback text when rates failed.
//! A number is never shown unless it was converted with the active rate.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use storefront_shared::{AppResult, CurrencyCode, DisplayConfig};
use tracing::debug;

use super::context::{CurrencyContext, RateSnapshot};
use super::error::CurrencyError;
use super::format::{NumberLocale, format_money};

/// Rendered state of a single price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PriceView {
    /// Rates (or the caller's own data) are still loading.
    Placeholder {
        /// Skeleton text.
        text: String,
    },
    /// Rates could not be loaded.
    Unavailable {
        /// Fallback text.
        text: String,
    },
    /// Converted and formatted price.
    Price {
        /// Formatted price, e.g. `₹8,310.00`.
        text: String,
        /// Converted amount.
        amount: Decimal,
        /// Currency of `amount`.
        currency: CurrencyCode,
    },
}

impl PriceView {
    /// Text to show.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Placeholder { text } | Self::Unavailable { text } | Self::Price { text, .. } => {
                text
            }
        }
    }

    /// True for a converted price.
    #[must_use]
    pub const fn is_price(&self) -> bool {
        matches!(self, Self::Price { .. })
    }
}

impl fmt::Display for PriceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Renders prices for the active currency.
#[derive(Debug, Clone)]
pub struct PriceDisplay {
    locale: NumberLocale,
    placeholder: String,
    fallback: String,
}

impl Default for PriceDisplay {
    fn default() -> Self {
        Self::new(NumberLocale::default(), "--", "Price unavailable")
    }
}

impl PriceDisplay {
    /// Creates a display with explicit texts.
    #[must_use]
    pub fn new(
        locale: NumberLocale,
        placeholder: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            locale,
            placeholder: placeholder.into(),
            fallback: fallback.into(),
        }
    }

    /// Builds a display from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an unsupported locale tag.
    pub fn from_config(config: &DisplayConfig) -> AppResult<Self> {
        Ok(Self::new(
            config.locale.parse()?,
            config.placeholder.clone(),
            config.fallback.clone(),
        ))
    }

    /// Locale used for formatting.
    #[must_use]
    pub const fn locale(&self) -> &NumberLocale {
        &self.locale
    }

    /// Renders one base-currency amount against the context's current state.
    ///
    /// `caller_loading` lets the caller force the placeholder while its own
    /// data (e.g. the product) is still loading.
    #[must_use]
    pub fn render(&self, context: &CurrencyContext, amount: Decimal, caller_loading: bool) -> PriceView {
        self.render_snapshot(&context.snapshot(), amount, caller_loading)
    }

    /// Renders one base-currency amount against a fixed snapshot.
    ///
    /// Use one snapshot for every price on a page so they all share a rate.
    #[must_use]
    pub fn render_snapshot(
        &self,
        snapshot: &RateSnapshot,
        amount: Decimal,
        caller_loading: bool,
    ) -> PriceView {
        if caller_loading {
            return self.placeholder();
        }

        match snapshot.convert(amount) {
            Ok(money) => PriceView::Price {
                text: format_money(&money, &self.locale),
                amount: money.amount,
                currency: money.currency,
            },
            Err(CurrencyError::RatesLoading(_)) => self.placeholder(),
            Err(e) => {
                debug!(currency = %snapshot.currency, error = %e, "Rendering price fallback");
                PriceView::Unavailable {
                    text: self.fallback.clone(),
                }
            }
        }
    }

    fn placeholder(&self) -> PriceView {
        PriceView::Placeholder {
            text: self.placeholder.clone(),
        }
    }
}
