use async_trait::async_trait;
use flightcheck_core::cache::Result;
use flightcheck_core::{FlightResult, ScheduleCache, ScheduleKey};
use moka::future::Cache;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

use crate::memory::DEFAULT_SCHEDULE_TTL;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Schedule cache backed by moka, expiring entries after a fixed TTL.
///
/// Expiry follows moka's own clock, so this backend suits running gateways;
/// tests that need to control time use
/// [`MemoryScheduleCache`](crate::MemoryScheduleCache).
#[derive(Debug, Clone)]
pub struct MokaScheduleCache {
    cache: Cache<String, FlightResult>,
}

impl MokaScheduleCache {
    /// Creates a cache with the default capacity and TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_MAX_CAPACITY, DEFAULT_SCHEDULE_TTL)
    }

    /// Creates a cache holding at most `max_capacity` results, each for `ttl`.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> MokaCacheConfigBuilder {
        MokaCacheConfig::builder()
    }
}

impl Default for MokaScheduleCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleCache for MokaScheduleCache {
    async fn get(&self, key: &ScheduleKey) -> Result<Option<FlightResult>> {
        let key = key.to_string();
        match self.cache.get(&key).await {
            Some(result) => {
                debug!(key = %key, "moka cache hit");
                Ok(Some(result))
            }
            None => {
                trace!(key = %key, "moka cache miss");
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &ScheduleKey, result: &FlightResult) -> Result<()> {
        let key = key.to_string();
        self.cache.insert(key.clone(), result.clone()).await;
        debug!(key = %key, "cached flight result in moka");
        Ok(())
    }

    async fn del(&self, key: &ScheduleKey) -> Result<()> {
        self.cache.invalidate(&key.to_string()).await;
        Ok(())
    }
}

/// Configuration for creating a [`MokaScheduleCache`] with custom settings.
#[derive(Debug, TypedBuilder)]
pub struct MokaCacheConfig {
    /// Maximum number of results the cache can hold.
    #[builder(default = DEFAULT_MAX_CAPACITY)]
    max_capacity: u64,
    /// Time-to-live for cached results.
    #[builder(default = DEFAULT_SCHEDULE_TTL)]
    ttl: Duration,
}

impl From<MokaCacheConfig> for MokaScheduleCache {
    fn from(config: MokaCacheConfig) -> Self {
        MokaScheduleCache::with_ttl(config.max_capacity, config.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightcheck_core::CanonicalFlightCode;

    fn key(code: &str) -> ScheduleKey {
        ScheduleKey {
            code: CanonicalFlightCode::new_unchecked(code),
            date: None,
        }
    }

    #[tokio::test]
    async fn cache_get_and_put() {
        let cache = MokaScheduleCache::new();
        let k = key("VOI870");
        assert!(cache.get(&k).await.unwrap().is_none());

        cache.put(&k, &FlightResult::no_data("VOI870")).await.unwrap();
        assert_eq!(
            cache.get(&k).await.unwrap(),
            Some(FlightResult::no_data("VOI870"))
        );
    }

    #[tokio::test]
    async fn cache_del_removes_entry() {
        let cache = MokaScheduleCache::new();
        let k = key("VOI870");
        cache.put(&k, &FlightResult::no_data("VOI870")).await.unwrap();

        cache.del(&k).await.unwrap();
        assert!(cache.get(&k).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cache_with_ttl_expires() {
        let cache = MokaScheduleCache::with_ttl(100, Duration::from_millis(50));
        let k = key("VOI870");
        cache.put(&k, &FlightResult::no_data("VOI870")).await.unwrap();
        assert!(cache.get(&k).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.get(&k).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cache_builder_pattern() {
        let cache: MokaScheduleCache = MokaScheduleCache::builder()
            .max_capacity(1000)
            .ttl(Duration::from_secs(60))
            .build()
            .into();

        let k = key("VOI870");
        cache.put(&k, &FlightResult::no_data("VOI870")).await.unwrap();
        assert!(cache.get(&k).await.unwrap().is_some());
    }
}
