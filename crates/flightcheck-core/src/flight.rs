use crate::code::CanonicalFlightCode;
use crate::error::Result;
use crate::time::OperatingZone;
use jiff::civil::Date;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One provider lookup: a canonical code, optionally narrowed to a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    pub code: CanonicalFlightCode,
    pub date: Option<Date>,
    /// `(start, end)` of the target day in the operating zone.
    pub window: Option<(Timestamp, Timestamp)>,
}

impl FlightQuery {
    pub fn new(code: CanonicalFlightCode, date: Option<Date>, zone: &OperatingZone) -> Result<Self> {
        let window = date.map(|d| zone.day_window(d)).transpose()?;
        Ok(Self { code, date, window })
    }

    pub fn key(&self) -> ScheduleKey {
        ScheduleKey {
            code: self.code.clone(),
            date: self.date,
        }
    }
}

/// ScheduleCache key, rendered as `code|date`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScheduleKey {
    pub code: CanonicalFlightCode,
    pub date: Option<Date>,
}

impl Display for ScheduleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.date {
            Some(date) => write!(f, "{}|{}", self.code, date),
            None => write!(f, "{}|", self.code),
        }
    }
}

pub const NO_DATA_MESSAGE: &str = "no data found";

/// Outcome of one provider lookup, as carried over the batch endpoint.
///
/// Either populated from the provider response, or a marker: `error` for
/// transport failures, `message` for confirmed absence of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightResult {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_airport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_airport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_out: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FlightResult {
    /// A result with only the code set.
    pub fn empty(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            departure_airport: None,
            arrival_airport: None,
            scheduled_out: None,
            scheduled_in: None,
            status: None,
            error: None,
            message: None,
        }
    }

    pub fn error_result(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(code)
        }
    }

    pub fn no_data(code: impl Into<String>) -> Self {
        Self {
            message: Some(NO_DATA_MESSAGE.to_string()),
            ..Self::empty(code)
        }
    }

    pub fn no_home_flight(code: impl Into<String>, home_airport: &str) -> Self {
        Self {
            message: Some(format!("no flight to {home_airport} found")),
            ..Self::empty(code)
        }
    }

    /// Whether this is a definitive outcome that may be cached. Transport
    /// and HTTP failures are not.
    pub fn is_terminal(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.to_ascii_lowercase().contains("cancelled"))
    }
}
