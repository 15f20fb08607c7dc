//! Shared types, errors, and configuration for the storefront.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes and money with decimal precision
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DisplayConfig, RatesConfig, ServerConfig};
pub use error::{AppError, AppResult};
pub use types::{CurrencyCode, CurrencyInfo, Money};
