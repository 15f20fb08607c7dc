//! Active currency routes.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use storefront_core::currency::RateSnapshot;
use storefront_shared::CurrencyCode;
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the currency routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/currency", get(get_currency).put(select_currency))
        .route("/currency/refresh", post(refresh_currency))
}

/// Request body for selecting the display currency.
#[derive(Debug, Deserialize)]
pub struct SelectCurrencyRequest {
    /// Currency code, any letter case.
    pub currency: String,
}

/// Current currency state.
#[derive(Debug, Serialize)]
pub struct CurrencyStateResponse {
    /// Currency selected for display.
    pub currency: CurrencyCode,
    /// Display name of `currency`, if it is in the catalogue.
    pub currency_name: Option<&'static str>,
    /// Currency backend amounts are denominated in.
    pub base_currency: CurrencyCode,
    /// Selection counter.
    pub generation: u64,
    /// True while rates are being fetched.
    pub is_loading: bool,
    /// Failure reason of the last fetch.
    pub error: Option<String>,
    /// Resolved multipliers, as decimal strings.
    pub rates: Option<BTreeMap<CurrencyCode, String>>,
}

impl From<&RateSnapshot> for CurrencyStateResponse {
    fn from(snapshot: &RateSnapshot) -> Self {
        Self {
            currency: snapshot.currency,
            currency_name: snapshot.currency.info().map(|info| info.name),
            base_currency: snapshot.base,
            generation: snapshot.generation,
            is_loading: snapshot.is_pending(),
            error: snapshot.error().map(str::to_owned),
            rates: snapshot.rates().map(|table| {
                table
                    .rates()
                    .iter()
                    .map(|(code, rate)| (*code, rate.normalize().to_string()))
                    .collect()
            }),
        }
    }
}

/// GET `/currency` - Current selection and rate state.
async fn get_currency(State(state): State<AppState>) -> Json<CurrencyStateResponse> {
    Json((&state.currency.snapshot()).into())
}

/// PUT `/currency` - Select the display currency.
async fn select_currency(
    State(state): State<AppState>,
    Json(payload): Json<SelectCurrencyRequest>,
) -> ApiResult<Json<CurrencyStateResponse>> {
    let currency = CurrencyCode::parse(&payload.currency)?;
    let snapshot = state.currency.set_currency(currency);
    info!(currency = %currency, generation = snapshot.generation, "Display currency changed");
    Ok(Json((&snapshot).into()))
}

/// POST `/currency/refresh` - Invalidate and refetch the active rates.
async fn refresh_currency(State(state): State<AppState>) -> Json<CurrencyStateResponse> {
    let snapshot = state.currency.refresh().await;
    Json((&snapshot).into())
}
