//! Verdict for a single arrival against its provider result.

use flightcheck_core::{
    to_instant, ComparisonRecord, ComparisonStatus, FlightResult, ItineraryEntry, OperatingZone,
    ServiceRef,
};
use jiff::civil::Date;
use jiff::SignedDuration;

/// Largest pickup/arrival gap still considered consistent, inclusive.
pub const DISCREPANCY_THRESHOLD: SignedDuration = SignedDuration::from_mins(5);

pub const MISSING_RESULT_MESSAGE: &str = "no flight information returned";
pub const CANCELLED_MESSAGE: &str = "flight cancelled";
pub const NO_ARRIVAL_TIME_MESSAGE: &str = "no scheduled arrival time available";
pub const INVALID_TIME_MESSAGE: &str = "invalid time format for comparison";
pub const MATCHING_MESSAGE: &str = "pickup matches the scheduled arrival";

pub fn acquisition_error_message(error: &str) -> String {
    format!("error acquiring flight info: {error}")
}

/// Classifies `entry` against the provider's answer for its flight.
///
/// Both times are read as wall-clock values on `date` in `zone`.
pub fn classify(
    entry: &ItineraryEntry,
    flight: Option<&FlightResult>,
    date: Date,
    zone: &OperatingZone,
) -> ComparisonRecord {
    let service = ServiceRef::from(entry);
    let record = |flight: Option<&FlightResult>, status, minutes, message: String| {
        ComparisonRecord {
            service: Some(service.clone()),
            flight: flight.cloned(),
            status,
            difference_minutes: minutes,
            message,
        }
    };

    let Some(flight) = flight else {
        return record(
            None,
            ComparisonStatus::NotFound,
            None,
            MISSING_RESULT_MESSAGE.to_string(),
        );
    };

    if let Some(error) = &flight.error {
        return record(
            Some(flight),
            ComparisonStatus::Error,
            None,
            acquisition_error_message(error),
        );
    }
    if let Some(message) = &flight.message {
        return record(Some(flight), ComparisonStatus::NotFound, None, message.clone());
    }
    if flight.is_cancelled() {
        return record(
            Some(flight),
            ComparisonStatus::Error,
            None,
            CANCELLED_MESSAGE.to_string(),
        );
    }
    let Some(scheduled_in) = flight.scheduled_in.as_deref() else {
        return record(
            Some(flight),
            ComparisonStatus::NotFound,
            None,
            NO_ARRIVAL_TIME_MESSAGE.to_string(),
        );
    };

    let instants = to_instant(&entry.pickup_time, date, zone)
        .and_then(|pickup| Ok((pickup, to_instant(scheduled_in, date, zone)?)));
    let Ok((pickup, arrival)) = instants else {
        return record(
            Some(flight),
            ComparisonStatus::Error,
            None,
            INVALID_TIME_MESSAGE.to_string(),
        );
    };

    let delta = pickup.duration_since(arrival).abs();
    let minutes = rounded_minutes(delta);
    if delta <= DISCREPANCY_THRESHOLD {
        record(
            Some(flight),
            ComparisonStatus::NoDiscrepancy,
            Some(minutes),
            MATCHING_MESSAGE.to_string(),
        )
    } else {
        record(
            Some(flight),
            ComparisonStatus::Discrepancy,
            Some(minutes),
            format!("{} difference from scheduled arrival", format_delta(minutes)),
        )
    }
}

fn rounded_minutes(delta: SignedDuration) -> i64 {
    (delta.as_secs() + 30).div_euclid(60)
}

/// `"1h 5m"`, or `"15m"` under an hour.
pub fn format_delta(minutes: i64) -> String {
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightcheck_core::{EntryId, EntryKind};
    use jiff::civil::date;

    fn zone() -> OperatingZone {
        OperatingZone::fixed(-5).unwrap()
    }

    fn arrival(pickup: &str) -> ItineraryEntry {
        ItineraryEntry {
            id: EntryId::new("svc-1"),
            kind: EntryKind::Arrival,
            flight_code: Some("AA2641".to_string()),
            pickup_time: pickup.to_string(),
            client_name: Some("Ana Ruiz".to_string()),
            hotel: None,
            passengers: None,
        }
    }

    fn arriving_at(scheduled_in: &str) -> FlightResult {
        FlightResult {
            arrival_airport: Some("CUN".into()),
            scheduled_in: Some(scheduled_in.into()),
            status: Some("Scheduled".into()),
            ..FlightResult::empty("AAL2641")
        }
    }

    fn verdict(pickup: &str, flight: Option<FlightResult>) -> ComparisonRecord {
        classify(&arrival(pickup), flight.as_ref(), date(2025, 3, 14), &zone())
    }

    #[test]
    fn fifteen_minutes_late_is_a_discrepancy() {
        let record = verdict("10:45 AM", Some(arriving_at("10:30 AM")));
        assert_eq!(record.status, ComparisonStatus::Discrepancy);
        assert_eq!(record.difference_minutes, Some(15));
        assert!(record.message.contains("15m"));
    }

    #[test]
    fn five_minutes_is_still_consistent() {
        let record = verdict("10:35", Some(arriving_at("10:30 AM")));
        assert_eq!(record.status, ComparisonStatus::NoDiscrepancy);
        assert_eq!(record.difference_minutes, Some(5));
    }

    #[test]
    fn five_minutes_and_a_second_is_not() {
        let record = verdict("2025-03-14T10:35:01", Some(arriving_at("10:30 AM")));
        assert_eq!(record.status, ComparisonStatus::Discrepancy);
        assert_eq!(record.difference_minutes, Some(5));
    }

    #[test]
    fn early_pickups_count_the_same() {
        let record = verdict("9:10 AM", Some(arriving_at("10:30 AM")));
        assert_eq!(record.status, ComparisonStatus::Discrepancy);
        assert_eq!(record.difference_minutes, Some(80));
        assert!(record.message.starts_with("1h 20m"));
    }

    #[test]
    fn unresolved_outcomes() {
        let missing = verdict("10:45 AM", None);
        assert_eq!(missing.status, ComparisonStatus::NotFound);
        assert_eq!(missing.message, MISSING_RESULT_MESSAGE);

        let failed = verdict(
            "10:45 AM",
            Some(FlightResult::error_result("AAL2641", "HTTP 500: Internal Server Error")),
        );
        assert_eq!(failed.status, ComparisonStatus::Error);
        assert_eq!(
            failed.message,
            "error acquiring flight info: HTTP 500: Internal Server Error"
        );

        let no_data = verdict("10:45 AM", Some(FlightResult::no_data("AAL2641")));
        assert_eq!(no_data.status, ComparisonStatus::NotFound);
        assert_eq!(no_data.message, "no data found");

        let cancelled = verdict(
            "10:45 AM",
            Some(FlightResult {
                status: Some("Cancelled".into()),
                ..arriving_at("10:30 AM")
            }),
        );
        assert_eq!(cancelled.status, ComparisonStatus::Error);
        assert_eq!(cancelled.message, CANCELLED_MESSAGE);

        let no_time = verdict(
            "10:45 AM",
            Some(FlightResult {
                scheduled_in: None,
                ..arriving_at("10:30 AM")
            }),
        );
        assert_eq!(no_time.status, ComparisonStatus::NotFound);
        assert_eq!(no_time.message, NO_ARRIVAL_TIME_MESSAGE);

        let garbled = verdict("quarter to eleven", Some(arriving_at("10:30 AM")));
        assert_eq!(garbled.status, ComparisonStatus::Error);
        assert_eq!(garbled.message, INVALID_TIME_MESSAGE);
        assert!(garbled.flight.is_some());
    }

    #[test]
    fn delta_rendering() {
        assert_eq!(format_delta(15), "15m");
        assert_eq!(format_delta(60), "1h 0m");
        assert_eq!(format_delta(135), "2h 15m");
    }
}
