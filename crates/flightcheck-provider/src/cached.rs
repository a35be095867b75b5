use crate::provider::FlightProvider;
use async_trait::async_trait;
use flightcheck_core::{FlightQuery, FlightResult, ScheduleCache};
use tracing::{debug, warn};

/// A provider decorator that serves repeated lookups from a [`ScheduleCache`].
///
/// Only terminal results are stored: found flights and confirmed absence of
/// data. Errors are always refetched. A failing cache degrades to a direct
/// provider call.
#[derive(Debug, Clone)]
pub struct CachedProvider<P, C> {
    inner: P,
    cache: C,
}

impl<P: FlightProvider, C: ScheduleCache> CachedProvider<P, C> {
    pub fn new(inner: P, cache: C) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

#[async_trait]
impl<P: FlightProvider, C: ScheduleCache> FlightProvider for CachedProvider<P, C> {
    async fn fetch(&self, query: &FlightQuery) -> FlightResult {
        let key = query.key();

        match self.cache.get(&key).await {
            Ok(Some(result)) => {
                debug!(key = %key, "serving flight result from cache");
                return result;
            }
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "schedule cache lookup failed"),
        }

        let result = self.inner.fetch(query).await;

        if result.is_terminal() {
            if let Err(e) = self.cache.put(&key, &result).await {
                warn!(key = %key, error = %e, "failed to cache flight result");
            }
        } else {
            debug!(key = %key, "not caching failed lookup");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightcheck_cache::{MemoryScheduleCache, DEFAULT_SCHEDULE_TTL};
    use flightcheck_core::cache::Result as CacheResult;
    use flightcheck_core::{
        CacheError, CanonicalFlightCode, ManualClock, OperatingZone, ScheduleKey,
    };
    use jiff::civil::date;
    use jiff::{SignedDuration, Timestamp};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        respond: fn(&str) -> FlightResult,
    }

    impl CountingProvider {
        fn new(respond: fn(&str) -> FlightResult) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                respond,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FlightProvider for CountingProvider {
        async fn fetch(&self, query: &FlightQuery) -> FlightResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.respond)(query.code.as_str())
        }
    }

    struct BrokenCache;

    #[async_trait]
    impl ScheduleCache for BrokenCache {
        async fn get(&self, _key: &ScheduleKey) -> CacheResult<Option<FlightResult>> {
            Err(CacheError::Unavailable("down".into()))
        }

        async fn put(&self, _key: &ScheduleKey, _result: &FlightResult) -> CacheResult<()> {
            Err(CacheError::Unavailable("down".into()))
        }

        async fn del(&self, _key: &ScheduleKey) -> CacheResult<()> {
            Ok(())
        }
    }

    fn found(code: &str) -> FlightResult {
        FlightResult {
            arrival_airport: Some("CUN".into()),
            scheduled_in: Some("10:30 AM".into()),
            ..FlightResult::empty(code)
        }
    }

    fn query(code: &str) -> FlightQuery {
        FlightQuery::new(
            CanonicalFlightCode::new_unchecked(code),
            Some(date(2025, 3, 14)),
            &OperatingZone::fixed(-5).unwrap(),
        )
        .unwrap()
    }

    fn memory_cache() -> (MemoryScheduleCache<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Timestamp::from_second(1_700_000_000).unwrap());
        (
            MemoryScheduleCache::with_clock(DEFAULT_SCHEDULE_TTL, clock.clone()),
            clock,
        )
    }

    #[tokio::test]
    async fn repeated_lookup_within_ttl_hits_the_cache() {
        let provider = CountingProvider::new(found);
        let (cache, clock) = memory_cache();
        let cached = CachedProvider::new(provider.clone(), cache);

        let first = cached.fetch(&query("AAL2641")).await;
        clock.advance(SignedDuration::from_secs(299));
        let second = cached.fetch(&query("AAL2641")).await;

        assert_eq!(first, second);
        assert_eq!(provider.calls(), 1);

        clock.advance(SignedDuration::from_secs(1));
        cached.fetch(&query("AAL2641")).await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn no_data_is_cached_under_code_and_date() {
        let provider = CountingProvider::new(|code| FlightResult::no_data(code));
        let (cache, _clock) = memory_cache();
        let cached = CachedProvider::new(provider.clone(), cache);

        cached.fetch(&query("AA2641")).await;
        cached.fetch(&query("AA2641")).await;
        assert_eq!(provider.calls(), 1);

        let key = query("AA2641").key();
        assert_eq!(key.to_string(), "AA2641|2025-03-14");
        assert_eq!(
            cached.cache().get(&key).await.unwrap(),
            Some(FlightResult::no_data("AA2641"))
        );
    }

    #[tokio::test]
    async fn errors_are_never_cached() {
        let provider =
            CountingProvider::new(|code| FlightResult::error_result(code, "HTTP 500: boom"));
        let (cache, _clock) = memory_cache();
        let cached = CachedProvider::new(provider.clone(), cache);

        cached.fetch(&query("AAL2641")).await;
        cached.fetch(&query("AAL2641")).await;
        assert_eq!(provider.calls(), 2);
        assert!(cached.cache().is_empty());
    }

    #[tokio::test]
    async fn broken_cache_falls_through_to_provider() {
        let provider = CountingProvider::new(found);
        let cached = CachedProvider::new(provider.clone(), BrokenCache);

        let result = cached.fetch(&query("AAL2641")).await;
        assert_eq!(result, found("AAL2641"));
        assert_eq!(provider.calls(), 1);
    }
}
