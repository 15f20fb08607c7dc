//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod currency;
pub mod health;
pub mod prices;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(currency::routes())
        .merge(prices::routes())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use http_body_util::BodyExt;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use storefront_core::currency::{
        CurrencyContext, CurrencyError, PriceDisplay, RateCache, RateSource, RateTable,
    };
    use storefront_shared::CurrencyCode;
    use tower::ServiceExt;

    use crate::AppState;

    /// Serves INR and EUR; everything else fails.
    pub struct StaticSource;

    #[async_trait]
    impl RateSource for StaticSource {
        async fn fetch_rates(&self, currency: &CurrencyCode) -> Result<RateTable, CurrencyError> {
            if *currency == CurrencyCode::INR || *currency == CurrencyCode::EUR {
                RateTable::new(
                    CurrencyCode::USD,
                    HashMap::from([
                        (CurrencyCode::INR, dec!(83.1)),
                        (CurrencyCode::EUR, dec!(0.92)),
                    ]),
                    Utc::now(),
                )
            } else {
                Err(CurrencyError::Fetch("backend unavailable".into()))
            }
        }
    }

    /// State with `initial` selected and its rates settled.
    pub async fn settled_state(initial: CurrencyCode) -> AppState {
        let currency = CurrencyContext::new(
            CurrencyCode::USD,
            initial,
            Arc::new(StaticSource),
            RateCache::new(),
        );
        currency.wait_until_settled().await;

        AppState {
            currency,
            display: Arc::new(PriceDisplay::default()),
        }
    }

    /// Sends a request through the full router and decodes the JSON body.
    pub async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let app: Router = crate::create_router(state);
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    pub fn json(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}
