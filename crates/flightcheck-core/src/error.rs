use thiserror::Error;

/// Errors raised by the pure domain functions of the reconciliation core.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unrecognized time format: '{0}'")]
    InvalidTime(String),
    #[error("invalid calendar date: '{0}'")]
    InvalidDate(String),
    #[error("unknown entry kind: '{0}'")]
    UnknownEntryKind(String),
    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),
}

/// Raised by [`ScheduleCache`](crate::ScheduleCache) backends that live
/// outside the process.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Failures of a whole batch lookup, as opposed to a single flight.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("schedule provider credentials are not configured")]
    MissingCredentials,
    #[error("schedule source unreachable: {0}")]
    Transport(String),
    #[error("schedule source rejected the request: {0}")]
    Rejected(String),
    #[error("schedule source returned an invalid response: {0}")]
    InvalidResponse(String),
    #[error("schedule lookup timed out")]
    Timeout,
}
