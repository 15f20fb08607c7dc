//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Exchange rate source configuration.
    pub rates: RatesConfig,
    /// Price display configuration.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Exchange rate source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Base URL of the storefront backend API.
    pub base_url: String,
    /// Currency every backend amount is denominated in.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Currency selected when a session starts.
    #[serde(default = "default_base_currency")]
    pub default_currency: String,
    /// How long a fetched rate table stays cached.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Maximum number of cached rate tables.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    /// Timeout for a single rate request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

fn default_cache_capacity() -> u64 {
    64
}

fn default_request_timeout() -> u64 {
    10
}

/// Price display configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Number formatting locale tag, e.g. `en-US` or `en-IN`.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Text rendered while rates are loading.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Text rendered when rates could not be loaded.
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            placeholder: default_placeholder(),
            fallback: default_fallback(),
        }
    }
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_placeholder() -> String {
    "--".to_string()
}

fn default_fallback() -> String {
    "Price unavailable".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("STOREFRONT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
