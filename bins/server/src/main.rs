//! Storefront pricing server
//!
//! Main entry point for the storefront currency and price rendering service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_api::{AppState, create_router};
use storefront_client::HttpRateSource;
use storefront_core::currency::{CurrencyContext, PriceDisplay, RateCache};
use storefront_shared::{AppConfig, CurrencyCode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    let base = CurrencyCode::parse(&config.rates.base_currency)?;
    let initial = CurrencyCode::parse(&config.rates.default_currency)?;

    // Rate source and cache
    let source = HttpRateSource::from_config(&config.rates)?;
    info!(url = %source.rates_url(), "Rates endpoint configured");
    let cache = RateCache::with_config(config.rates.cache_capacity, config.rates.cache_ttl_secs);

    let display = PriceDisplay::from_config(&config.display)?;
    let locale = display.locale();
    info!(
        locale = %locale,
        base = %base,
        currency = %initial,
        "Price display configured"
    );

    // Create application state
    let state = AppState {
        currency: CurrencyContext::new(base, initial, Arc::new(source), cache),
        display: Arc::new(display),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
