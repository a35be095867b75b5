use crate::signature::Signature;
use dashmap::DashMap;
use flightcheck_core::{Clock, ComparisonRecord, EntryId, SystemClock};
use jiff::{SignedDuration, Timestamp};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// How long a reconciled batch is reused before it is recomputed.
pub const DEFAULT_COMPARISON_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct CachedBatch {
    records: Vec<ComparisonRecord>,
    stored_at: Timestamp,
}

/// Memoizes whole reconciliation batches by [`Signature`].
///
/// A batch is served only while `now - stored_at < ttl`; writes sweep out
/// expired batches at most once per `ttl`. Writers to the same signature
/// are last-writer-wins.
#[derive(Debug, Clone)]
pub struct ComparisonCache<C = SystemClock> {
    batches: Arc<DashMap<Signature, CachedBatch>>,
    ttl: SignedDuration,
    clock: C,
    last_sweep: Arc<AtomicI64>,
}

impl ComparisonCache<SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl Default for ComparisonCache<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_COMPARISON_TTL)
    }
}

impl<C: Clock> ComparisonCache<C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        let last_sweep = Arc::new(AtomicI64::new(clock.now().as_second()));
        Self {
            batches: Arc::new(DashMap::new()),
            ttl: SignedDuration::try_from(ttl).unwrap_or(SignedDuration::MAX),
            clock,
            last_sweep,
        }
    }

    pub fn get(&self, signature: &Signature) -> Option<Vec<ComparisonRecord>> {
        let Some(batch) = self.batches.get(signature) else {
            trace!(signature = %signature, "comparison cache miss");
            return None;
        };

        if !self.is_fresh(&batch, self.clock.now()) {
            drop(batch);
            self.batches.remove(signature);
            debug!(signature = %signature, "comparison batch expired");
            return None;
        }

        debug!(signature = %signature, "comparison cache hit");
        Some(batch.records.clone())
    }

    pub fn put(&self, signature: Signature, records: Vec<ComparisonRecord>) {
        debug!(signature = %signature, records = records.len(), "caching comparison batch");
        let now = self.clock.now();
        let due = self
            .last_sweep
            .load(Ordering::Relaxed)
            .saturating_add(self.ttl.as_secs());
        if now.as_second() >= due {
            self.purge_expired();
        }
        self.batches.insert(
            signature,
            CachedBatch {
                records,
                stored_at: now,
            },
        );
    }

    /// Drops every cached batch.
    pub fn invalidate(&self) {
        self.batches.clear();
    }

    pub fn purge_expired(&self) {
        let now = self.clock.now();
        self.last_sweep.store(now.as_second(), Ordering::Relaxed);
        self.batches.retain(|_, batch| self.is_fresh(batch, now));
    }

    /// Number of batches that are still served.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.batches
            .iter()
            .filter(|batch| self.is_fresh(batch.value(), now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the record of `entry_id` in every live batch that holds it,
    /// keeping each batch's age. Returns how many records were replaced.
    pub fn patch_entry(&self, entry_id: &EntryId, record: &ComparisonRecord) -> usize {
        let now = self.clock.now();
        let mut patched = 0;
        for mut batch in self.batches.iter_mut() {
            if !self.is_fresh(&batch, now) {
                continue;
            }
            for cached in batch
                .records
                .iter_mut()
                .filter(|r| r.entry_id() == Some(entry_id))
            {
                *cached = record.clone();
                patched += 1;
            }
        }
        debug!(entry_id = %entry_id, patched, "patched cached comparison records");
        patched
    }

    fn is_fresh(&self, batch: &CachedBatch, now: Timestamp) -> bool {
        now.duration_since(batch.stored_at) < self.ttl
    }
}
