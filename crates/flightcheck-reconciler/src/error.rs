use flightcheck_core::{ComparisonStatus, CoreError, EntryId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconcileError>;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("only discrepancy records can be applied, this one is {0:?}")]
    NotApplicable(ComparisonStatus),
    #[error("record has no flight to take the arrival time from")]
    MissingScheduledTime,
    #[error(transparent)]
    InvalidTime(#[from] CoreError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid gateway url '{url}': {reason}")]
    InvalidGatewayUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failures of the external itinerary store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entry {0} does not exist")]
    UnknownEntry(EntryId),
    #[error("failed to access itinerary file: {0}")]
    Io(#[from] std::io::Error),
    #[error("itinerary file is not valid: {0}")]
    Format(#[from] serde_json::Error),
}
