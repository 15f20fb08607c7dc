//! Multi-currency price conversion and display.

pub mod cache;
pub mod context;
pub mod display;
pub mod error;
pub mod format;
pub mod rates;
pub mod service;
pub mod source;

#[cfg(test)]
mod props;

pub use cache::RateCache;
pub use context::{CurrencyContext, RateSnapshot, RateStatus};
pub use display::{PriceDisplay, PriceView};
pub use error::CurrencyError;
pub use format::{NumberLocale, format_money};
pub use rates::RateTable;
pub use service::CurrencyService;
pub use source::RateSource;
