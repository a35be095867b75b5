//! Client side of schedule reconciliation.
//!
//! [`Reconciler`] classifies itinerary arrivals against provider schedules
//! obtained from any [`ScheduleSource`](flightcheck_core::ScheduleSource),
//! typically a [`GatewayClient`], and memoizes each batch in a
//! [`ComparisonCache`] keyed by the batch's content [`Signature`].

pub mod cache;
pub mod classify;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod signature;
pub mod store;

pub use cache::{ComparisonCache, DEFAULT_COMPARISON_TTL};
pub use classify::{classify, format_delta, DISCREPANCY_THRESHOLD};
pub use engine::{ReconcileSettings, Reconciler, DEFAULT_LOOKUP_TIMEOUT};
pub use error::{ReconcileError, StoreError};
pub use gateway::GatewayClient;
pub use signature::Signature;
pub use store::{ItineraryStore, JsonFileStore};
