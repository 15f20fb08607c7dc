//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Currency selection and rate state routes
//! - Price rendering routes
//! - JSON error responses derived from `AppError`

pub mod error;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use storefront_core::currency::{CurrencyContext, PriceDisplay};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Active currency and its rate table.
    pub currency: CurrencyContext,
    /// Price formatting rules.
    pub display: Arc<PriceDisplay>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
