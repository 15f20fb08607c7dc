//! Currency context: the active currency and its exchange rate table.
//!
//! The context is an explicit provider object handed to every price
//! consumer. Only `set_currency` and `refresh` change it; readers take
//! snapshots or subscribe to a watch channel and never lock.
//!
//! Every selection bumps a generation counter. A rate fetch result is
//! applied only if its generation is still current, so a slow response for
//! an earlier selection can never overwrite the latest one.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;

use rust_decimal::Decimal;
use storefront_shared::{CurrencyCode, Money};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::cache::RateCache;
use super::error::CurrencyError;
use super::rates::RateTable;
use super::service::CurrencyService;
use super::source::RateSource;

/// Lifecycle of the rate table for the active currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateStatus {
    /// Nothing requested yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Rates resolved.
    Ready(Arc<RateTable>),
    /// The last fetch failed; cleared by the next selection or refresh.
    Failed(String),
}

/// Point-in-time view of the currency context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSnapshot {
    /// Currency all incoming amounts are denominated in.
    pub base: CurrencyCode,
    /// Currency selected for display.
    pub currency: CurrencyCode,
    /// Selection counter; increases on every selection or refresh.
    pub generation: u64,
    /// Rate table state for `currency`.
    pub status: RateStatus,
}

impl RateSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(
        base: CurrencyCode,
        currency: CurrencyCode,
        generation: u64,
        status: RateStatus,
    ) -> Self {
        Self {
            base,
            currency,
            generation,
            status,
        }
    }

    /// True while rates are unresolved (idle or loading).
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, RateStatus::Idle | RateStatus::Loading)
    }

    /// True while a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, RateStatus::Loading)
    }

    /// Failure reason of the last fetch, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            RateStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Resolved rate table, if any.
    #[must_use]
    pub fn rates(&self) -> Option<&Arc<RateTable>> {
        match &self.status {
            RateStatus::Ready(table) => Some(table),
            _ => None,
        }
    }

    /// Converts a base-currency amount into the selected currency.
    ///
    /// Selecting the base currency converts without a rate table. In every
    /// other case a number is returned only after it has been multiplied by
    /// the resolved rate.
    ///
    /// # Errors
    ///
    /// - `CurrencyError::RatesLoading` while rates are unresolved
    /// - `CurrencyError::RatesUnavailable` if the last fetch failed
    /// - `CurrencyError::MissingRate` if the table lacks the selected currency
    pub fn convert(&self, amount: Decimal) -> Result<Money, CurrencyError> {
        if self.currency == self.base {
            return Ok(Money::new(amount, self.currency));
        }

        match &self.status {
            RateStatus::Idle | RateStatus::Loading => {
                Err(CurrencyError::RatesLoading(self.currency))
            }
            RateStatus::Failed(reason) => Err(CurrencyError::RatesUnavailable {
                currency: self.currency,
                reason: reason.clone(),
            }),
            RateStatus::Ready(table) => {
                CurrencyService::convert_with_table(amount, table, self.currency)
            }
        }
    }
}

/// How a selection treats the currently active one.
#[derive(Debug, Clone, Copy)]
enum Selection {
    /// Skip if the currency is already active and has not failed.
    Change,
    /// Always start over.
    Force,
    /// Start over only if nothing was selected since `generation`.
    Refresh { generation: u64 },
}

/// Shared currency state for one storefront session.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct CurrencyContext {
    inner: Arc<Inner>,
}

struct Inner {
    base: CurrencyCode,
    source: Arc<dyn RateSource>,
    cache: RateCache,
    state: watch::Sender<RateSnapshot>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl CurrencyContext {
    /// Creates a context and immediately applies the initial selection.
    ///
    /// Must be called from within a Tokio runtime; rate fetches run as
    /// spawned tasks.
    #[must_use]
    pub fn new(
        base: CurrencyCode,
        initial: CurrencyCode,
        source: Arc<dyn RateSource>,
        cache: RateCache,
    ) -> Self {
        let (state, _) = watch::channel(RateSnapshot::new(base, initial, 0, RateStatus::Idle));

        let context = Self {
            inner: Arc::new(Inner {
                base,
                source,
                cache,
                state,
                in_flight: Mutex::new(None),
            }),
        };
        context.select(initial, Selection::Force);
        context
    }

    /// Selects the display currency.
    ///
    /// Re-selecting the active currency is a no-op unless its last fetch
    /// failed. Any fetch still in flight for an earlier selection is
    /// cancelled.
    pub fn set_currency(&self, currency: CurrencyCode) -> RateSnapshot {
        self.select(currency, Selection::Change)
    }

    /// Drops the cached table for the active currency and fetches it again.
    ///
    /// A selection made while the cache entry is being dropped takes
    /// precedence; the refresh then leaves it alone.
    pub async fn refresh(&self) -> RateSnapshot {
        let observed = self.snapshot();
        self.inner.cache.invalidate(&observed.currency).await;
        info!(currency = %observed.currency, "Rate table invalidated");
        self.reselect(&observed)
    }

    fn reselect(&self, observed: &RateSnapshot) -> RateSnapshot {
        self.select(
            observed.currency,
            Selection::Refresh {
                generation: observed.generation,
            },
        )
    }

    /// Converts a base-currency amount into the active currency.
    ///
    /// # Errors
    ///
    /// See [`RateSnapshot::convert`].
    pub fn convert(&self, amount: Decimal) -> Result<Money, CurrencyError> {
        self.inner.state.borrow().convert(amount)
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> RateSnapshot {
        self.inner.state.borrow().clone()
    }

    /// True while a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    /// Failure reason of the last fetch, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error().map(str::to_owned)
    }

    /// Resolved rate table for the active currency.
    #[must_use]
    pub fn rates(&self) -> Option<Arc<RateTable>> {
        self.inner.state.borrow().rates().cloned()
    }

    /// Currency selected for display.
    #[must_use]
    pub fn active_currency(&self) -> CurrencyCode {
        self.inner.state.borrow().currency
    }

    /// Currency every incoming amount is denominated in.
    #[must_use]
    pub fn base_currency(&self) -> CurrencyCode {
        self.inner.base
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RateSnapshot> {
        self.inner.state.subscribe()
    }

    /// Waits until the current selection has resolved or failed.
    pub async fn wait_until_settled(&self) -> RateSnapshot {
        let mut rx = self.inner.state.subscribe();
        let settled = rx.wait_for(|snapshot| !snapshot.is_pending()).await;
        match settled {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        }
    }

    fn select(&self, currency: CurrencyCode, selection: Selection) -> RateSnapshot {
        let mut in_flight = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let generation = {
            let current = self.inner.state.borrow();
            let keep = match selection {
                Selection::Change => {
                    current.currency == currency
                        && !matches!(current.status, RateStatus::Failed(_))
                }
                Selection::Force => false,
                Selection::Refresh { generation } => current.generation != generation,
            };
            if keep {
                if let Selection::Refresh { generation } = selection {
                    debug!(
                        stale = generation,
                        current = current.generation,
                        "Refresh superseded by a newer selection"
                    );
                }
                return current.clone();
            }
            current.generation + 1
        };

        if let Some(handle) = in_flight.take() {
            handle.abort();
        }

        let base = self.inner.base;
        if currency == base {
            let snapshot = RateSnapshot::new(
                base,
                currency,
                generation,
                RateStatus::Ready(Arc::new(RateTable::identity(base))),
            );
            self.inner.state.send_replace(snapshot.clone());
            info!(currency = %currency, generation, "Base currency selected");
            return snapshot;
        }

        let snapshot = RateSnapshot::new(base, currency, generation, RateStatus::Loading);
        self.inner.state.send_replace(snapshot.clone());
        info!(currency = %currency, generation, "Currency selected, fetching rates");

        let inner = Arc::clone(&self.inner);
        *in_flight = Some(tokio::spawn(async move {
            let status = match AssertUnwindSafe(inner.resolve(currency)).catch_unwind().await {
                Ok(status) => status,
                Err(_) => {
                    error!(currency = %currency, generation, "Rate source panicked");
                    RateStatus::Failed(format!("rate source panicked while fetching {currency}"))
                }
            };
            inner.publish(generation, status);
        }));

        snapshot
    }

    #[cfg(test)]
    fn publish(&self, generation: u64, status: RateStatus) -> bool {
        self.inner.publish(generation, status)
    }
}

impl Inner {
    async fn resolve(&self, currency: CurrencyCode) -> RateStatus {
        if let Some(table) = self.cache.get(&currency).await {
            debug!(currency = %currency, "Rate table served from cache");
            return RateStatus::Ready(table);
        }

        match self.source.fetch_rates(&currency).await {
            Ok(table) if table.base() != self.base => {
                warn!(
                    currency = %currency,
                    expected = %self.base,
                    received = %table.base(),
                    "Rate table has unexpected base currency"
                );
                RateStatus::Failed(format!(
                    "rate table is based on {} instead of {}",
                    table.base(),
                    self.base
                ))
            }
            Ok(table) => {
                let table = Arc::new(table);
                self.cache.insert(currency, Arc::clone(&table)).await;
                debug!(currency = %currency, entries = table.len(), "Rate table fetched");
                RateStatus::Ready(table)
            }
            Err(e) => {
                warn!(currency = %currency, error = %e, "Rate fetch failed");
                RateStatus::Failed(e.to_string())
            }
        }
    }

    fn publish(&self, generation: u64, status: RateStatus) -> bool {
        self.state.send_if_modified(|snapshot| {
            if snapshot.generation != generation {
                debug!(
                    stale = generation,
                    current = snapshot.generation,
                    "Discarding rate result for superseded selection"
                );
                return false;
            }
            snapshot.status = status;
            true
        })
    }
}
