use crate::entry::{EntryId, ItineraryEntry};
use crate::flight::FlightResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    Loading,
    NoDiscrepancy,
    Discrepancy,
    NotFound,
    Error,
}

impl ComparisonStatus {
    /// Whether the flight was found and compared.
    pub fn is_found(self) -> bool {
        matches!(
            self,
            ComparisonStatus::NoDiscrepancy | ComparisonStatus::Discrepancy
        )
    }

    pub fn tab(self) -> ComparisonTab {
        match self {
            ComparisonStatus::NoDiscrepancy => ComparisonTab::NoDiscrepancy,
            ComparisonStatus::Discrepancy => ComparisonTab::Discrepancy,
            ComparisonStatus::Loading | ComparisonStatus::NotFound | ComparisonStatus::Error => {
                ComparisonTab::Unresolved
            }
        }
    }
}

/// Identifies the compared entry, with the fields an operator needs to
/// recognize it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRef {
    pub entry_id: EntryId,
    pub flight_code: String,
    pub pickup_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel: Option<String>,
}

impl From<&ItineraryEntry> for ServiceRef {
    fn from(entry: &ItineraryEntry) -> Self {
        Self {
            entry_id: entry.id.clone(),
            flight_code: entry.flight_code().unwrap_or_default().to_string(),
            pickup_time: entry.pickup_time.clone(),
            client_name: entry.client_name.clone(),
            hotel: entry.hotel.clone(),
        }
    }
}

pub const NO_ARRIVALS_MESSAGE: &str = "no arrivals with a flight code to compare";

/// The verdict for one arrival entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    /// `None` only for the placeholder produced when there is nothing to compare.
    pub service: Option<ServiceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<FlightResult>,
    pub status: ComparisonStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference_minutes: Option<i64>,
    pub message: String,
}

impl ComparisonRecord {
    pub fn loading(service: ServiceRef) -> Self {
        Self {
            service: Some(service),
            flight: None,
            status: ComparisonStatus::Loading,
            difference_minutes: None,
            message: String::new(),
        }
    }

    pub fn no_arrivals() -> Self {
        Self {
            service: None,
            flight: None,
            status: ComparisonStatus::NotFound,
            difference_minutes: None,
            message: NO_ARRIVALS_MESSAGE.to_string(),
        }
    }

    pub fn entry_id(&self) -> Option<&EntryId> {
        self.service.as_ref().map(|s| &s.entry_id)
    }
}

/// The three groups records are reviewed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonTab {
    NoDiscrepancy,
    Discrepancy,
    /// Not found, failed, or still loading.
    Unresolved,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TabbedRecords {
    pub no_discrepancy: Vec<ComparisonRecord>,
    pub discrepancy: Vec<ComparisonRecord>,
    pub unresolved: Vec<ComparisonRecord>,
}

impl TabbedRecords {
    pub fn tab(&self, tab: ComparisonTab) -> &[ComparisonRecord] {
        match tab {
            ComparisonTab::NoDiscrepancy => &self.no_discrepancy,
            ComparisonTab::Discrepancy => &self.discrepancy,
            ComparisonTab::Unresolved => &self.unresolved,
        }
    }
}

/// Splits records into review tabs, keeping their relative order.
pub fn group_by_tab<'a, I>(records: I) -> TabbedRecords
where
    I: IntoIterator<Item = &'a ComparisonRecord>,
{
    let mut tabs = TabbedRecords::default();
    for record in records {
        let bucket = match record.status.tab() {
            ComparisonTab::NoDiscrepancy => &mut tabs.no_discrepancy,
            ComparisonTab::Discrepancy => &mut tabs.discrepancy,
            ComparisonTab::Unresolved => &mut tabs.unresolved,
        };
        bucket.push(record.clone());
    }
    tabs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, status: ComparisonStatus) -> ComparisonRecord {
        ComparisonRecord {
            service: Some(ServiceRef {
                entry_id: EntryId::new(id),
                flight_code: "AA2641".into(),
                pickup_time: "10:45 AM".into(),
                client_name: None,
                hotel: None,
            }),
            flight: None,
            status,
            difference_minutes: None,
            message: String::new(),
        }
    }

    #[test]
    fn groups_into_three_tabs() {
        let records = vec![
            record("a", ComparisonStatus::Discrepancy),
            record("b", ComparisonStatus::NoDiscrepancy),
            record("c", ComparisonStatus::Error),
            record("d", ComparisonStatus::NotFound),
            record("e", ComparisonStatus::Discrepancy),
        ];

        let tabs = group_by_tab(&records);
        let ids = |tab: ComparisonTab| -> Vec<String> {
            tabs.tab(tab)
                .iter()
                .map(|r| r.entry_id().unwrap().to_string())
                .collect()
        };

        assert_eq!(ids(ComparisonTab::Discrepancy), vec!["a", "e"]);
        assert_eq!(ids(ComparisonTab::NoDiscrepancy), vec!["b"]);
        assert_eq!(ids(ComparisonTab::Unresolved), vec!["c", "d"]);
    }

    #[test]
    fn found_statuses() {
        assert!(ComparisonStatus::NoDiscrepancy.is_found());
        assert!(ComparisonStatus::Discrepancy.is_found());
        assert!(!ComparisonStatus::NotFound.is_found());
        assert!(!ComparisonStatus::Loading.is_found());
    }

    #[test]
    fn placeholder_has_no_service() {
        let placeholder = ComparisonRecord::no_arrivals();
        assert_eq!(placeholder.status, ComparisonStatus::NotFound);
        assert!(placeholder.entry_id().is_none());
        assert_eq!(placeholder.message, NO_ARRIVALS_MESSAGE);
    }
}
