use async_trait::async_trait;
use flightcheck_core::{FlightQuery, FlightResult};
use std::sync::Arc;

/// Looks up a single flight.
#[async_trait]
pub trait FlightProvider: Send + Sync + 'static {
    /// Never fails: transport and HTTP failures are encoded in
    /// [`FlightResult::error`].
    async fn fetch(&self, query: &FlightQuery) -> FlightResult;
}

#[async_trait]
impl<P: FlightProvider + ?Sized> FlightProvider for Arc<P> {
    async fn fetch(&self, query: &FlightQuery) -> FlightResult {
        (**self).fetch(query).await
    }
}
