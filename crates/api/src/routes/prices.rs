//! Price rendering routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::currency::PriceView;
use storefront_shared::{AppError, CurrencyCode};

use crate::AppState;
use crate::error::ApiResult;

/// Creates the price routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/prices/render", get(render_price).post(render_prices))
}

/// Query parameters for rendering one price.
#[derive(Debug, Deserialize)]
pub struct RenderPriceQuery {
    /// Amount in the base currency.
    pub amount: Decimal,
    /// Caller's own data is still loading.
    #[serde(default)]
    pub loading: bool,
}

/// Request body for rendering a batch of prices.
#[derive(Debug, Deserialize)]
pub struct RenderPricesRequest {
    /// Amounts in the base currency.
    pub amounts: Vec<Decimal>,
    /// Caller's own data is still loading.
    #[serde(default)]
    pub loading: bool,
}

/// Batch of rendered prices sharing one rate snapshot.
#[derive(Debug, Serialize)]
pub struct RenderPricesResponse {
    /// Currency the prices are shown in.
    pub currency: CurrencyCode,
    /// One view per requested amount, in order.
    pub prices: Vec<PriceView>,
}

fn ensure_non_negative(amount: Decimal) -> Result<(), AppError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::Validation(format!(
            "Amount must not be negative: {amount}"
        )));
    }
    Ok(())
}

/// GET `/prices/render?amount=..` - Render one base-currency amount.
async fn render_price(
    State(state): State<AppState>,
    Query(query): Query<RenderPriceQuery>,
) -> ApiResult<Json<PriceView>> {
    ensure_non_negative(query.amount)?;
    Ok(Json(
        state
            .display
            .render(&state.currency, query.amount, query.loading),
    ))
}

/// POST `/prices/render` - Render many amounts against the same rates.
async fn render_prices(
    State(state): State<AppState>,
    Json(payload): Json<RenderPricesRequest>,
) -> ApiResult<Json<RenderPricesResponse>> {
    for amount in &payload.amounts {
        ensure_non_negative(*amount)?;
    }

    let snapshot = state.currency.snapshot();
    let prices = payload
        .amounts
        .into_iter()
        .map(|amount| {
            state
                .display
                .render_snapshot(&snapshot, amount, payload.loading)
        })
        .collect();

    Ok(Json(RenderPricesResponse {
        currency: snapshot.currency,
        prices,
    }))
}
