use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Opaque identifier of an itinerary entry in the external store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deserializes from any casing, e.g. `"arrival"` or `"ARRIVAL"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum EntryKind {
    Arrival,
    Departure,
    Transfer,
}

impl FromStr for EntryKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ARRIVAL" => Ok(EntryKind::Arrival),
            "DEPARTURE" => Ok(EntryKind::Departure),
            "TRANSFER" => Ok(EntryKind::Transfer),
            _ => Err(CoreError::UnknownEntryKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for EntryKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Arrival => f.write_str("ARRIVAL"),
            EntryKind::Departure => f.write_str("DEPARTURE"),
            EntryKind::Transfer => f.write_str("TRANSFER"),
        }
    }
}

/// A booked ground service, as held by the itinerary store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    #[serde(default)]
    pub flight_code: Option<String>,
    /// Recorded pickup time, in whichever notation the entry arrived with.
    #[serde(default)]
    pub pickup_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passengers: Option<u32>,
}

impl ItineraryEntry {
    /// The flight code if present and not blank.
    pub fn flight_code(&self) -> Option<&str> {
        self.flight_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// Whether this entry takes part in reconciliation: an arrival that
    /// names a flight.
    pub fn is_reconcilable(&self) -> bool {
        self.kind == EntryKind::Arrival && self.flight_code().is_some()
    }
}
