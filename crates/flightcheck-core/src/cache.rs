use crate::error::CacheError;
use crate::flight::{FlightResult, ScheduleKey};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, CacheError>;

/// Server-side cache of provider lookups, keyed by `code|date`.
///
/// Implementations must treat an entry older than their TTL as absent.
#[async_trait]
pub trait ScheduleCache: Send + Sync + 'static {
    /// Get a cached result.
    ///
    /// Returns `Ok(None)` if the key is absent or expired.
    async fn get(&self, key: &ScheduleKey) -> Result<Option<FlightResult>>;

    /// Store a result, restarting its time-to-live.
    async fn put(&self, key: &ScheduleKey, result: &FlightResult) -> Result<()>;

    /// Remove a result. It is not an error if the key does not exist.
    async fn del(&self, key: &ScheduleKey) -> Result<()>;
}
