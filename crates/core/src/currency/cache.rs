//! Rate table caching using Moka.
//!
//! Keeps the last successfully fetched table per selected currency so that
//! switching back and forth between currencies does not hit the backend
//! until the entry expires or is invalidated.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use storefront_shared::CurrencyCode;

use super::rates::RateTable;

/// Default cache capacity (number of currencies).
const DEFAULT_CACHE_CAPACITY: u64 = 64;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Cache of rate tables keyed by the currency they were fetched for.
///
/// Cloning is cheap; clones share the same entries. Failed fetches are
/// never stored.
#[derive(Clone)]
pub struct RateCache {
    cache: Cache<CurrencyCode, Arc<RateTable>>,
}

impl RateCache {
    /// Creates a new rate cache with default settings.
    ///
    /// Default: 64 entries max, 5 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a new rate cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of tables to cache
    /// * `ttl_secs` - Time-to-live in seconds for each table
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Returns the cached table for `currency`, if still live.
    pub async fn get(&self, currency: &CurrencyCode) -> Option<Arc<RateTable>> {
        self.cache.get(currency).await
    }

    /// Stores a freshly fetched table.
    pub async fn insert(&self, currency: CurrencyCode, table: Arc<RateTable>) {
        self.cache.insert(currency, table).await;
    }

    /// Drops the cached table for `currency`.
    pub async fn invalidate(&self, currency: &CurrencyCode) {
        self.cache.invalidate(currency).await;
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    ///
    /// Moka applies evictions lazily; this flushes them so counts are exact.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}
