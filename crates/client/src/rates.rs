//! Exchange rate endpoint client.
//!
//! `GET {base_url}/currency/rates?currency=INR` answers either a bare map
//! (`{"INR": 83.1, "EUR": 0.92}`) or an envelope
//! (`{"base": "USD", "rates": {...}}`). Multipliers are decoded straight
//! into `Decimal`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use storefront_core::currency::{CurrencyError, RateSource, RateTable};
use storefront_shared::{AppError, AppResult, CurrencyCode, RatesConfig};
use tracing::{debug, warn};

/// Path of the rates endpoint below the backend base URL.
const RATES_PATH: &str = "/currency/rates";

/// Body of a rates response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RatesResponse {
    Envelope {
        base: Option<String>,
        rates: HashMap<String, Value>,
    },
    Bare(HashMap<String, Value>),
}

/// Fetches rate tables from the storefront backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: Client,
    base_url: String,
    base: CurrencyCode,
}

impl HttpRateSource {
    /// Creates a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, base: CurrencyCode, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            base,
        })
    }

    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a malformed base currency.
    pub fn from_config(config: &RatesConfig) -> AppResult<Self> {
        Self::new(
            config.base_url.clone(),
            CurrencyCode::parse(&config.base_currency)?,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Full URL of the rates endpoint.
    #[must_use]
    pub fn rates_url(&self) -> String {
        format!("{}{RATES_PATH}", self.base_url)
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rates(&self, currency: &CurrencyCode) -> Result<RateTable, CurrencyError> {
        let url = self.rates_url();
        debug!(url = %url, currency = %currency, "Fetching exchange rates");

        let response = self
            .client
            .get(&url)
            .query(&[("currency", currency.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CurrencyError::Fetch(format!("request timed out: {e}"))
                } else {
                    CurrencyError::Fetch(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Rates endpoint returned an error status");
            return Err(CurrencyError::Fetch(format!("rates endpoint returned {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CurrencyError::Fetch(e.to_string()))?;

        parse_rates(&body, self.base, Utc::now())
    }
}

/// Decodes a rates response body.
///
/// Entries whose key is not a currency code or whose value is not a number
/// (or numeric string) are skipped. The envelope's `base`, when present,
/// overrides `default_base`.
///
/// # Errors
///
/// - `CurrencyError::Fetch` if the body is not a rates document
/// - `CurrencyError::InvalidRate` if a multiplier is zero or negative
pub fn parse_rates(
    body: &[u8],
    default_base: CurrencyCode,
    fetched_at: DateTime<Utc>,
) -> Result<RateTable, CurrencyError> {
    let response: RatesResponse = serde_json::from_slice(body)
        .map_err(|e| CurrencyError::Fetch(format!("malformed rates response: {e}")))?;

    let (base, raw) = match response {
        RatesResponse::Envelope { base, rates } => {
            let base = match base {
                Some(code) => CurrencyCode::parse(&code)
                    .map_err(|e| CurrencyError::Fetch(e.to_string()))?,
                None => default_base,
            };
            (base, rates)
        }
        RatesResponse::Bare(rates) => (default_base, rates),
    };

    let mut rates = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        match (CurrencyCode::parse(&key), decode_rate(&value)) {
            (Ok(code), Some(rate)) => {
                rates.insert(code, rate);
            }
            _ => warn!(key = %key, value = %value, "Skipping non-rate entry in rates response"),
        }
    }

    RateTable::new(base, rates, fetched_at)
}

fn decode_rate(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(_) | Value::String(_) => <Decimal as Deserialize>::deserialize(value).ok(),
        _ => None,
    }
}
