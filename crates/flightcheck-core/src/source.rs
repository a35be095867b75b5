use crate::code::CanonicalFlightCode;
use crate::error::SourceError;
use crate::flight::FlightResult;
use async_trait::async_trait;
use jiff::civil::Date;
use std::sync::Arc;

/// Resolves a batch of flight codes to provider results in one round trip.
#[async_trait]
pub trait ScheduleSource: Send + Sync + 'static {
    /// Returns exactly one result per input code, in input order, including
    /// repeated codes.
    ///
    /// Per-flight failures are carried inside the results; `Err` is reserved
    /// for failures of the batch as a whole.
    async fn lookup(
        &self,
        codes: &[CanonicalFlightCode],
        date: Option<Date>,
    ) -> Result<Vec<FlightResult>, SourceError>;
}

#[async_trait]
impl<S: ScheduleSource + ?Sized> ScheduleSource for Arc<S> {
    async fn lookup(
        &self,
        codes: &[CanonicalFlightCode],
        date: Option<Date>,
    ) -> Result<Vec<FlightResult>, SourceError> {
        (**self).lookup(codes, date).await
    }
}
