use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A flight designator in the schedule provider's format: a three letter
/// ICAO carrier code followed by the flight number without leading zeros.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalFlightCode(String);

impl CanonicalFlightCode {
    /// Wraps a code that is already known to be canonical, e.g. one echoed
    /// back by the batch endpoint.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CanonicalFlightCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalFlightCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Carrier designators and names seen in itineraries, mapped to ICAO codes.
const CARRIERS: &[(&str, &str)] = &[
    ("AA", "AAL"),
    ("AMERICAN", "AAL"),
    ("UA", "UAL"),
    ("UNITED", "UAL"),
    ("DL", "DAL"),
    ("DELTA", "DAL"),
    ("WN", "SWA"),
    ("SOUTHWEST", "SWA"),
    ("B6", "JBU"),
    ("JETBLUE", "JBU"),
    ("AS", "ASA"),
    ("ALASKA", "ASA"),
    ("NK", "NKS"),
    ("SPIRIT", "NKS"),
    ("F9", "FFT"),
    ("FRONTIER", "FFT"),
    ("G4", "AAY"),
    ("ALLEGIANT", "AAY"),
    ("SY", "SCX"),
    ("SUNCOUNTRY", "SCX"),
    ("AM", "AMX"),
    ("AEROMEXICO", "AMX"),
    ("Y4", "VOI"),
    ("VOLARIS", "VOI"),
    ("VB", "VIV"),
    ("VIVAAEROBUS", "VIV"),
    ("P5", "RPB"),
    ("WINGO", "RPB"),
    ("AC", "ACA"),
    ("AIRCANADA", "ACA"),
    ("WS", "WJA"),
    ("WESTJET", "WJA"),
    ("WG", "SWG"),
    ("SUNWING", "SWG"),
    ("TS", "TSC"),
    ("AIRTRANSAT", "TSC"),
    ("BA", "BAW"),
    ("IB", "IBE"),
    ("AF", "AFR"),
    ("KL", "KLM"),
    ("LH", "DLH"),
    ("UX", "AEA"),
    ("CM", "CMP"),
    ("COPA", "CMP"),
    ("AV", "AVA"),
    ("AVIANCA", "AVA"),
    ("DE", "CFG"),
    ("CONDOR", "CFG"),
    ("BY", "TOM"),
    ("X3", "TUI"),
];

/// Significant digits allowed in a flight number once leading zeros are gone.
const MAX_FLIGHT_NUMBER_DIGITS: usize = 4;

/// Maps a free-form airline + flight number string to the provider's
/// canonical designator.
///
/// Never fails: input that cannot be understood is returned with its
/// whitespace removed, and the provider lookup will simply not resolve it.
///
/// ```
/// use flightcheck_core::normalize_flight_code;
///
/// assert_eq!(normalize_flight_code("AA 2641").as_str(), "AAL2641");
/// assert_eq!(normalize_flight_code("P5 07436").as_str(), "RPB7436");
/// ```
pub fn normalize_flight_code(raw: &str) -> CanonicalFlightCode {
    let trimmed = raw.trim();

    if is_icao_shaped(trimmed) {
        return CanonicalFlightCode(trimmed.to_ascii_uppercase());
    }

    let Some((prefix, number)) = split_designator(trimmed) else {
        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        return CanonicalFlightCode(compact);
    };

    let prefix = prefix.to_ascii_uppercase();
    let carrier = lookup_carrier(&prefix).unwrap_or(prefix.as_str());
    let number = number
        .parse::<u32>()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| number.to_string());

    CanonicalFlightCode(format!("{carrier}{number}"))
}

fn lookup_carrier(prefix: &str) -> Option<&'static str> {
    CARRIERS
        .iter()
        .find(|(alias, _)| *alias == prefix)
        .map(|(_, icao)| *icao)
}

/// Three alphanumerics followed by one to four digits, e.g. `AMX0123`.
fn is_icao_shaped(code: &str) -> bool {
    let bytes = code.as_bytes();
    if !(4..=7).contains(&bytes.len()) {
        return false;
    }
    bytes[..3].iter().all(u8::is_ascii_alphanumeric) && bytes[3..].iter().all(u8::is_ascii_digit)
}

/// Splits `<prefix><spaces?><digits>` where the prefix is either a two
/// character alphanumeric designator or an alphabetic carrier name.
fn split_designator(code: &str) -> Option<(&str, &str)> {
    let digits_start = code
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx)?;

    let prefix = code[..digits_start].trim_end();
    let number = &code[digits_start..];

    if is_prefix(prefix) && is_flight_number(number) {
        return Some((prefix, number));
    }

    // `P5007436`: a designator ending in a digit, written without a separator.
    if code.is_char_boundary(2) {
        let (prefix, number) = code.split_at(2);
        let number = number.trim_start();
        if is_two_char_designator(prefix)
            && !number.is_empty()
            && number.bytes().all(|b| b.is_ascii_digit())
            && is_flight_number(number)
        {
            return Some((prefix, number));
        }
    }

    None
}

fn is_prefix(prefix: &str) -> bool {
    let alphabetic_name = prefix.len() >= 2 && prefix.chars().all(|c| c.is_ascii_alphabetic());
    alphabetic_name || is_two_char_designator(prefix)
}

fn is_two_char_designator(prefix: &str) -> bool {
    prefix.len() == 2
        && prefix.chars().all(|c| c.is_ascii_alphanumeric())
        && prefix.chars().any(|c| c.is_ascii_alphabetic())
}

fn is_flight_number(number: &str) -> bool {
    let significant = number.trim_start_matches('0');
    !number.is_empty() && significant.len() <= MAX_FLIGHT_NUMBER_DIGITS
}
