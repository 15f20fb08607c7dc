//! Core pricing logic for the storefront.
//!
//! This crate contains pure logic with ZERO web dependencies. Exchange
//! rates arrive through the [`currency::RateSource`] port, implemented by
//! the client crate.
//!
//! # Modules
//!
//! - `currency` - Active currency, rate tables, conversion and price display

pub mod currency;
