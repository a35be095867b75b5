//! Outbound side of schedule reconciliation.
//!
//! [`ProviderClient`] queries the flight schedule provider for one canonical
//! code, retrying on rate limiting. [`CachedProvider`] puts a
//! [`ScheduleCache`](flightcheck_core::ScheduleCache) in front of it, and
//! [`ScheduleService`] answers whole batches, fetching each unique code once.

pub mod aeroapi;
pub mod cached;
pub mod client;
pub mod error;
pub mod provider;
pub mod service;
pub mod transport;

pub use cached::CachedProvider;
pub use client::{ProviderClient, ProviderSettings};
pub use error::{ProviderError, TransportError};
pub use provider::FlightProvider;
pub use service::{BatchSettings, ScheduleService};
pub use transport::{HttpTransport, ProviderRequest, ProviderResponse, ReqwestTransport};
