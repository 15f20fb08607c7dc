//! HTTP adapters for the storefront backend.
//!
//! The backend owns pricing; this crate only fetches exchange rate tables
//! and hands them to the core crate through [`RateSource`].
//!
//! [`RateSource`]: storefront_core::currency::RateSource

pub mod rates;

pub use rates::HttpRateSource;
