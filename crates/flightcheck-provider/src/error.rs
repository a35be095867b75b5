use thiserror::Error;

/// Errors raised while setting up a provider client.
///
/// Lookups themselves never fail with this type: per-flight failures are
/// reported inside [`FlightResult`](flightcheck_core::FlightResult).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid provider base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// A request that never produced an HTTP response.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);
