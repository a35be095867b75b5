use async_trait::async_trait;
use dashmap::DashMap;
use flightcheck_core::cache::Result;
use flightcheck_core::{Clock, FlightResult, ScheduleCache, ScheduleKey, SystemClock};
use jiff::{SignedDuration, Timestamp};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// How long a provider lookup is reused before it is fetched again.
pub const DEFAULT_SCHEDULE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct Entry {
    result: FlightResult,
    stored_at: Timestamp,
}

/// In-memory schedule cache whose expiry is decided by a [`Clock`].
///
/// An entry is served only while `now - stored_at < ttl`. Expired entries
/// are dropped on access, and writes sweep the whole map at most once per
/// `ttl`. Concurrent writers to the same key are last-writer-wins.
#[derive(Debug, Clone)]
pub struct MemoryScheduleCache<C = SystemClock> {
    storage: Arc<DashMap<String, Entry>>,
    ttl: SignedDuration,
    clock: C,
    /// Unix second of the last full sweep.
    last_sweep: Arc<AtomicI64>,
}

impl MemoryScheduleCache<SystemClock> {
    /// Creates a cache backed by the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl Default for MemoryScheduleCache<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEDULE_TTL)
    }
}

impl<C: Clock> MemoryScheduleCache<C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        let last_sweep = Arc::new(AtomicI64::new(clock.now().as_second()));
        Self {
            storage: Arc::new(DashMap::new()),
            ttl: SignedDuration::try_from(ttl).unwrap_or(SignedDuration::MAX),
            clock,
            last_sweep,
        }
    }

    /// Number of entries that are still served.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.storage
            .iter()
            .filter(|entry| self.is_fresh(entry.value(), now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every expired entry.
    pub fn purge_expired(&self) {
        let now = self.clock.now();
        self.last_sweep.store(now.as_second(), Ordering::Relaxed);
        self.storage.retain(|_, entry| self.is_fresh(entry, now));
    }

    fn sweep_if_due(&self, now: Timestamp) {
        let due = self
            .last_sweep
            .load(Ordering::Relaxed)
            .saturating_add(self.ttl.as_secs());
        if now.as_second() >= due {
            self.purge_expired();
            trace!(remaining = self.storage.len(), "swept memory cache");
        }
    }

    fn is_fresh(&self, entry: &Entry, now: Timestamp) -> bool {
        now.duration_since(entry.stored_at) < self.ttl
    }
}

#[async_trait]
impl<C: Clock> ScheduleCache for MemoryScheduleCache<C> {
    async fn get(&self, key: &ScheduleKey) -> Result<Option<FlightResult>> {
        let key = key.to_string();
        trace!(key = %key, "looking up flight result in memory cache");

        let Some(entry) = self.storage.get(&key) else {
            trace!(key = %key, "memory cache miss");
            return Ok(None);
        };

        if !self.is_fresh(&entry, self.clock.now()) {
            drop(entry);
            self.storage.remove(&key);
            debug!(key = %key, "memory cache entry expired");
            return Ok(None);
        }

        debug!(key = %key, "memory cache hit");
        Ok(Some(entry.result.clone()))
    }

    async fn put(&self, key: &ScheduleKey, result: &FlightResult) -> Result<()> {
        let key = key.to_string();
        let now = self.clock.now();
        self.sweep_if_due(now);
        self.storage.insert(
            key.clone(),
            Entry {
                result: result.clone(),
                stored_at: now,
            },
        );
        debug!(key = %key, "cached flight result in memory");
        Ok(())
    }

    async fn del(&self, key: &ScheduleKey) -> Result<()> {
        self.storage.remove(&key.to_string());
        Ok(())
    }
}
