use crate::cache::{ComparisonCache, DEFAULT_COMPARISON_TTL};
use crate::classify::{acquisition_error_message, classify, MATCHING_MESSAGE};
use crate::error::{ReconcileError, Result};
use crate::signature::Signature;
use crate::store::ItineraryStore;
use flightcheck_core::{
    normalize_flight_code, parse_wall_clock, CanonicalFlightCode, Clock, ComparisonRecord,
    ComparisonStatus, FlightResult, ItineraryEntry, OperatingZone, ScheduleSource, ServiceRef,
    SourceError, SystemClock, TimeFormat,
};
use jiff::civil::Date;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use typed_builder::TypedBuilder;

/// Upper bound on one batch lookup before every entry is reported failed.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, TypedBuilder)]
pub struct ReconcileSettings {
    pub zone: OperatingZone,
    #[builder(default = DEFAULT_LOOKUP_TIMEOUT)]
    pub lookup_timeout: Duration,
    #[builder(default = DEFAULT_COMPARISON_TTL)]
    pub cache_ttl: Duration,
}

/// Compares itinerary arrivals against provider schedules, memoizing
/// each batch by its [`Signature`].
pub struct Reconciler<S, C = SystemClock> {
    source: S,
    cache: ComparisonCache<C>,
    settings: ReconcileSettings,
}

impl<S: ScheduleSource> Reconciler<S, SystemClock> {
    pub fn new(source: S, settings: ReconcileSettings) -> Self {
        Self::with_clock(source, settings, SystemClock)
    }
}

impl<S: ScheduleSource, C: Clock> Reconciler<S, C> {
    pub fn with_clock(source: S, settings: ReconcileSettings, clock: C) -> Self {
        Self {
            source,
            cache: ComparisonCache::with_clock(settings.cache_ttl, clock),
            settings,
        }
    }

    pub fn cache(&self) -> &ComparisonCache<C> {
        &self.cache
    }

    /// Classifies every reconcilable arrival in `entries`, serving a cached
    /// batch when the same arrivals were reconciled for `date` recently.
    ///
    /// Never fails: lookup failures become `error` records.
    pub async fn reconcile(
        &self,
        entries: &[ItineraryEntry],
        date: Date,
    ) -> Vec<ComparisonRecord> {
        let signature = Signature::of(entries, date);
        if let Some(records) = self.cache.get(&signature) {
            return records;
        }
        self.compute(entries, date, signature).await
    }

    /// Like [`reconcile`](Self::reconcile) but always recomputes, replacing
    /// any cached batch.
    pub async fn force_refresh(
        &self,
        entries: &[ItineraryEntry],
        date: Date,
    ) -> Vec<ComparisonRecord> {
        let signature = Signature::of(entries, date);
        self.compute(entries, date, signature).await
    }

    #[instrument(skip(self, entries, signature), fields(entries = entries.len()))]
    async fn compute(
        &self,
        entries: &[ItineraryEntry],
        date: Date,
        signature: Signature,
    ) -> Vec<ComparisonRecord> {
        let arrivals: Vec<&ItineraryEntry> =
            entries.iter().filter(|e| e.is_reconcilable()).collect();
        if arrivals.is_empty() {
            debug!("no reconcilable arrivals");
            let records = vec![ComparisonRecord::no_arrivals()];
            self.cache.put(signature, records.clone());
            return records;
        }

        let codes: Vec<CanonicalFlightCode> = arrivals
            .iter()
            .map(|entry| normalize_flight_code(entry.flight_code().unwrap_or_default()))
            .collect();
        let mut unique: Vec<CanonicalFlightCode> = Vec::with_capacity(codes.len());
        for code in &codes {
            if !unique.contains(code) {
                unique.push(code.clone());
            }
        }

        let results = match self.lookup(&unique, date).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "flight batch lookup failed");
                // not cached, so the next call retries the lookup
                return arrivals
                    .iter()
                    .map(|entry| ComparisonRecord {
                        status: ComparisonStatus::Error,
                        message: acquisition_error_message(&e.to_string()),
                        ..ComparisonRecord::loading(ServiceRef::from(*entry))
                    })
                    .collect();
            }
        };

        let by_code: HashMap<&CanonicalFlightCode, &FlightResult> =
            unique.iter().zip(results.iter()).collect();
        let records: Vec<ComparisonRecord> = arrivals
            .iter()
            .zip(&codes)
            .map(|(entry, code)| {
                classify(entry, by_code.get(code).copied(), date, &self.settings.zone)
            })
            .collect();

        info!(
            arrivals = records.len(),
            lookups = unique.len(),
            discrepancies = records
                .iter()
                .filter(|r| r.status == ComparisonStatus::Discrepancy)
                .count(),
            "reconciled arrivals"
        );
        self.cache.put(signature, records.clone());
        records
    }

    async fn lookup(
        &self,
        codes: &[CanonicalFlightCode],
        date: Date,
    ) -> std::result::Result<Vec<FlightResult>, SourceError> {
        tokio::time::timeout(
            self.settings.lookup_timeout,
            self.source.lookup(codes, Some(date)),
        )
        .await
        .unwrap_or(Err(SourceError::Timeout))
    }

    /// Adopts the provider's arrival time as the entry's pickup time.
    ///
    /// The new time is rendered in the notation the entry already uses,
    /// persisted through `store`, and patched into every cached batch so a
    /// cached copy cannot bring the discrepancy back. Returns the resolved
    /// record.
    pub async fn apply_detected_time(
        &self,
        record: &ComparisonRecord,
        store: &dyn ItineraryStore,
    ) -> Result<ComparisonRecord> {
        if record.status != ComparisonStatus::Discrepancy {
            return Err(ReconcileError::NotApplicable(record.status));
        }
        let (Some(service), Some(scheduled_in)) = (
            record.service.as_ref(),
            record.flight.as_ref().and_then(|f| f.scheduled_in.as_deref()),
        ) else {
            return Err(ReconcileError::MissingScheduledTime);
        };

        let format = TimeFormat::detect(&service.pickup_time);
        let reference = match format {
            TimeFormat::Iso { date, .. } => date,
            _ => Date::constant(2000, 1, 1),
        };
        let detected = parse_wall_clock(scheduled_in, reference)?;
        let pickup_time = format.render(detected.time());

        store
            .persist_pickup_time(&service.entry_id, &pickup_time)
            .await?;

        let resolved = ComparisonRecord {
            service: Some(ServiceRef {
                pickup_time: pickup_time.clone(),
                ..service.clone()
            }),
            status: ComparisonStatus::NoDiscrepancy,
            difference_minutes: Some(0),
            message: MATCHING_MESSAGE.to_string(),
            ..record.clone()
        };
        let patched = self.cache.patch_entry(&service.entry_id, &resolved);
        info!(
            entry_id = %service.entry_id,
            pickup_time = %pickup_time,
            patched,
            "applied detected arrival time"
        );
        Ok(resolved)
    }
}
