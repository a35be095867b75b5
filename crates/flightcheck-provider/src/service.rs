use crate::provider::FlightProvider;
use async_trait::async_trait;
use flightcheck_core::{
    CanonicalFlightCode, Clock, FlightQuery, FlightResult, OperatingZone, ScheduleSource,
    SourceError, SystemClock,
};
use futures::stream::{self, StreamExt};
use jiff::civil::Date;
use jiff::Timestamp;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument};
use typed_builder::TypedBuilder;

/// Fetch fan-out for one batch.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct BatchSettings {
    /// Unique codes fetched at once. `1` fetches strictly one after another.
    #[builder(default = 1)]
    pub max_concurrency: usize,
    /// Minimum gap between the starts of consecutive fetches: fetch `n`
    /// of a batch starts no earlier than `n * call_spacing` after the first.
    #[builder(default = Duration::ZERO)]
    pub call_spacing: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Answers batch lookups through a [`FlightProvider`], fetching each unique
/// code once and fanning the results back out in request order.
pub struct ScheduleService<P, C = SystemClock> {
    provider: P,
    zone: OperatingZone,
    settings: BatchSettings,
    clock: C,
}

impl<P: FlightProvider> ScheduleService<P, SystemClock> {
    pub fn new(provider: P, zone: OperatingZone, settings: BatchSettings) -> Self {
        Self::with_clock(provider, zone, settings, SystemClock)
    }
}

impl<P: FlightProvider, C: Clock> ScheduleService<P, C> {
    pub fn with_clock(provider: P, zone: OperatingZone, settings: BatchSettings, clock: C) -> Self {
        Self {
            provider,
            zone,
            settings,
            clock,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn fetch_spaced(
        &self,
        started: Timestamp,
        index: usize,
        query: FlightQuery,
    ) -> (CanonicalFlightCode, FlightResult) {
        let spacing = self.settings.call_spacing;
        if index > 0 && !spacing.is_zero() {
            let offset = spacing.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
            let elapsed = Duration::try_from(self.clock.now().duration_since(started))
                .unwrap_or(Duration::ZERO);
            let wait = offset.saturating_sub(elapsed);
            if !wait.is_zero() {
                self.clock.sleep(wait).await;
            }
        }
        let result = self.provider.fetch(&query).await;
        (query.code, result)
    }
}

#[async_trait]
impl<P: FlightProvider, C: Clock> ScheduleSource for ScheduleService<P, C> {
    #[instrument(skip(self, codes), fields(codes = codes.len()))]
    async fn lookup(
        &self,
        codes: &[CanonicalFlightCode],
        date: Option<Date>,
    ) -> Result<Vec<FlightResult>, SourceError> {
        let mut unique: Vec<&CanonicalFlightCode> = Vec::new();
        for code in codes {
            if !unique.contains(&code) {
                unique.push(code);
            }
        }

        let queries = unique
            .into_iter()
            .map(|code| FlightQuery::new(code.clone(), date, &self.zone))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SourceError::Rejected(e.to_string()))?;

        debug!(unique = queries.len(), "fetching unique flight codes");

        let started = self.clock.now();
        let fetched: HashMap<CanonicalFlightCode, FlightResult> = stream::iter(queries)
            .enumerate()
            .map(|(index, query)| self.fetch_spaced(started, index, query))
            .buffer_unordered(self.settings.max_concurrency.max(1))
            .collect()
            .await;

        let results: Vec<FlightResult> = codes
            .iter()
            .map(|code| {
                fetched.get(code).cloned().unwrap_or_else(|| {
                    FlightResult::error_result(code.as_str(), "lookup was not performed")
                })
            })
            .collect();

        info!(
            requested = codes.len(),
            fetched = fetched.len(),
            "flight batch resolved"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightcheck_core::ManualClock;
    use jiff::civil::date;
    use std::sync::{Arc, Mutex};

    /// Never moves, so every fetch in a batch sees the same start time.
    #[derive(Clone, Default)]
    struct FrozenClock {
        sleeps: Arc<Mutex<Vec<Duration>>>,
    }

    #[async_trait]
    impl Clock for FrozenClock {
        fn now(&self) -> Timestamp {
            Timestamp::UNIX_EPOCH
        }

        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    #[derive(Default)]
    struct RecordingProvider {
        fetched: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FlightProvider for RecordingProvider {
        async fn fetch(&self, query: &FlightQuery) -> FlightResult {
            self.fetched.lock().unwrap().push(query.code.to_string());
            FlightResult {
                scheduled_in: Some("10:30 AM".into()),
                ..FlightResult::empty(query.code.as_str())
            }
        }
    }

    fn codes(raw: &[&str]) -> Vec<CanonicalFlightCode> {
        raw.iter().map(|c| CanonicalFlightCode::new_unchecked(*c)).collect()
    }

    fn service(
        settings: BatchSettings,
    ) -> (ScheduleService<RecordingProvider, ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        let service = ScheduleService::with_clock(
            RecordingProvider::default(),
            OperatingZone::fixed(-5).unwrap(),
            settings,
            clock.clone(),
        );
        (service, clock)
    }

    #[tokio::test]
    async fn duplicates_are_fetched_once_and_fanned_out() {
        let (service, _) = service(BatchSettings::default());

        let results = service
            .lookup(&codes(&["AAL2641", "VOI870", "AAL2641"]), Some(date(2025, 3, 14)))
            .await
            .unwrap();

        let returned: Vec<&str> = results.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(returned, vec!["AAL2641", "VOI870", "AAL2641"]);
        assert_eq!(results[0], results[2]);
        assert_eq!(
            *service.provider().fetched.lock().unwrap(),
            vec!["AAL2641".to_string(), "VOI870".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_batch_fetches_nothing() {
        let (service, _) = service(BatchSettings::default());
        let results = service.lookup(&[], None).await.unwrap();
        assert!(results.is_empty());
        assert!(service.provider().fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn spacing_precedes_every_fetch_but_the_first() {
        let spacing = Duration::from_millis(250);
        let (service, clock) = service(BatchSettings::builder().call_spacing(spacing).build());

        service
            .lookup(&codes(&["AAL2641", "VOI870", "RPB7436"]), None)
            .await
            .unwrap();

        assert_eq!(clock.sleeps(), vec![spacing, spacing]);
    }

    #[tokio::test]
    async fn concurrent_fetches_keep_request_order() {
        let (service, _) = service(BatchSettings::builder().max_concurrency(4).build());

        let input = codes(&["VOI870", "AAL2641", "RPB7436", "VOI870"]);
        let results = service.lookup(&input, None).await.unwrap();

        let returned: Vec<&str> = results.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(returned, vec!["VOI870", "AAL2641", "RPB7436", "VOI870"]);
        assert_eq!(service.provider().fetched.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn concurrent_fetches_are_staggered_by_the_spacing() {
        let spacing = Duration::from_millis(250);
        let clock = FrozenClock::default();
        let service = ScheduleService::with_clock(
            RecordingProvider::default(),
            OperatingZone::fixed(-5).unwrap(),
            BatchSettings::builder()
                .max_concurrency(3)
                .call_spacing(spacing)
                .build(),
            clock.clone(),
        );

        service
            .lookup(&codes(&["AAL2641", "VOI870", "RPB7436"]), None)
            .await
            .unwrap();

        let mut sleeps = clock.sleeps.lock().unwrap().clone();
        sleeps.sort();
        assert_eq!(sleeps, vec![spacing, spacing * 2]);
    }
}
