use flightcheck_core::ItineraryEntry;
use jiff::civil::Date;
use std::fmt::Display;

/// Content key of a reconciliation batch.
///
/// Derived from the date and the sorted `id:code:time` triple of every
/// reconcilable arrival, so any change to one of those fields yields a new
/// key while edits to other fields keep it stable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn of(entries: &[ItineraryEntry], date: Date) -> Self {
        let mut triples: Vec<String> = entries
            .iter()
            .filter(|entry| entry.is_reconcilable())
            .map(|entry| {
                format!(
                    "{}:{}:{}",
                    entry.id,
                    entry.flight_code().unwrap_or_default(),
                    entry.pickup_time.trim()
                )
            })
            .collect();
        triples.sort_unstable();

        Self(format!("{date}::{}", triples.join("|")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
