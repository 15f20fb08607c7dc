//! Property-based tests for currency conversion and display.
//!
//! - Base currency conversion is the identity
//! - Conversion equals amount * rate (Banker's Rounding, 4 dp)
//! - Pending rates never render a number
//! - Failed rates always render the fallback text

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use storefront_shared::CurrencyCode;

use super::context::{RateSnapshot, RateStatus};
use super::display::{PriceDisplay, PriceView};
use super::rates::RateTable;
use super::service::CurrencyService;

/// Strategy to generate non-negative amounts (0.00 to 1,000,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn ready(currency: CurrencyCode, rate: Decimal) -> RateSnapshot {
    let table = RateTable::new(CurrencyCode::USD, HashMap::from([(currency, rate)]), Utc::now())
        .expect("positive rate");
    RateSnapshot::new(CurrencyCode::USD, currency, 1, RateStatus::Ready(Arc::new(table)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* amount, converting into the base currency returns it unchanged,
    /// whatever state the rates are in.
    #[test]
    fn prop_base_currency_is_identity(amount in amount(), loading in any::<bool>()) {
        let status = if loading { RateStatus::Loading } else { RateStatus::Failed("down".into()) };
        let snapshot = RateSnapshot::new(CurrencyCode::USD, CurrencyCode::USD, 1, status);
        let money = snapshot.convert(amount).unwrap();
        prop_assert_eq!(money.amount, amount);
        prop_assert_eq!(money.currency, CurrencyCode::USD);
    }

    /// *For any* amount and rate, conversion multiplies by the active rate.
    #[test]
    fn prop_convert_multiplies_by_active_rate(amount in amount(), rate in positive_rate()) {
        let money = ready(CurrencyCode::INR, rate).convert(amount).unwrap();
        prop_assert_eq!(money.amount, CurrencyService::round(amount * rate, 4));
        prop_assert_eq!(money.currency, CurrencyCode::INR);
    }

    /// *For any* amount, a pending fetch renders the placeholder.
    #[test]
    fn prop_pending_never_renders_number(amount in amount()) {
        let snapshot = RateSnapshot::new(CurrencyCode::USD, CurrencyCode::INR, 1, RateStatus::Loading);
        let view = PriceDisplay::default().render_snapshot(&snapshot, amount, false);
        prop_assert!(matches!(view, PriceView::Placeholder { .. }), "expected placeholder, got {}", view);
    }

    /// *For any* amount, a failed fetch renders exactly the fallback text.
    #[test]
    fn prop_failed_renders_fallback(amount in amount(), reason in ".*") {
        let snapshot = RateSnapshot::new(CurrencyCode::USD, CurrencyCode::INR, 1, RateStatus::Failed(reason));
        let view = PriceDisplay::default().render_snapshot(&snapshot, amount, false);
        prop_assert_eq!(view.to_string(), "Price unavailable");
    }

    /// *For any* resolved price, the text always has exactly two decimals.
    #[test]
    fn prop_price_has_two_decimals(amount in amount(), rate in positive_rate()) {
        let view = PriceDisplay::default().render_snapshot(&ready(CurrencyCode::INR, rate), amount, false);
        let text = view.to_string();
        let decimals = text.rsplit('.').next().unwrap_or_default();
        prop_assert_eq!(decimals.len(), 2, "{} should end with two decimals", text);
        prop_assert!(text.starts_with('₹'));
    }
}
