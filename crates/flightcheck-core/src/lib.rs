//! Core types and traits for flight schedule reconciliation.
//!
//! This crate holds the pure normalizers (flight codes and wall-clock times),
//! the data model shared by the gateway and the reconciliation engine, and
//! the seams (clock, schedule cache, schedule source) the other crates
//! implement.

pub mod cache;
pub mod clock;
pub mod code;
pub mod comparison;
pub mod entry;
pub mod error;
pub mod flight;
pub mod source;
pub mod time;

pub use cache::ScheduleCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use code::{normalize_flight_code, CanonicalFlightCode};
pub use comparison::{
    group_by_tab, ComparisonRecord, ComparisonStatus, ComparisonTab, ServiceRef, TabbedRecords,
};
pub use entry::{EntryId, EntryKind, ItineraryEntry};
pub use error::{CacheError, CoreError, SourceError};
pub use flight::{FlightQuery, FlightResult, ScheduleKey};
pub use source::ScheduleSource;
pub use time::{format_twelve_hour, parse_wall_clock, to_instant, OperatingZone, TimeFormat};

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<jiff::civil::Date, CoreError> {
    time::parse_date(value.trim()).ok_or_else(|| CoreError::InvalidDate(value.to_string()))
}
