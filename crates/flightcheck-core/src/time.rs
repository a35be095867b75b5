//! Wall-clock parsing for the ad-hoc time notations found in itineraries and
//! in provider responses.
//!
//! Every value is interpreted as a wall-clock reading in the single
//! [`OperatingZone`], never as UTC, so two readings of the same local time
//! always compare equal regardless of where the process runs.

use crate::error::{CoreError, Result};
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::{Offset, TimeZone};
use jiff::Timestamp;

/// The time zone all wall-clock comparisons are performed in.
#[derive(Debug, Clone)]
pub struct OperatingZone {
    tz: TimeZone,
}

impl OperatingZone {
    pub const DEFAULT_NAME: &'static str = "America/Cancun";

    /// Looks up an IANA zone such as `America/Cancun`.
    pub fn named(name: &str) -> Result<Self> {
        let tz = TimeZone::get(name)
            .map_err(|e| CoreError::UnknownTimeZone(format!("{name}: {e}")))?;
        Ok(Self { tz })
    }

    /// A zone with a constant UTC offset, in whole hours.
    pub fn fixed(hours: i8) -> Result<Self> {
        let offset = Offset::from_hours(hours)
            .map_err(|e| CoreError::UnknownTimeZone(format!("UTC{hours:+}: {e}")))?;
        Ok(Self {
            tz: TimeZone::fixed(offset),
        })
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }

    /// The instant at which the wall clock in this zone reads `datetime`.
    pub fn instant(&self, datetime: DateTime) -> Result<Timestamp> {
        self.tz
            .to_timestamp(datetime)
            .map_err(|e| CoreError::InvalidTime(format!("{datetime}: {e}")))
    }

    /// What the wall clock in this zone reads at `instant`.
    pub fn wall_clock(&self, instant: Timestamp) -> DateTime {
        self.tz.to_datetime(instant)
    }

    /// First and last second (00:00:00 and 23:59:59) of `date` in this zone.
    pub fn day_window(&self, date: Date) -> Result<(Timestamp, Timestamp)> {
        let start = self.instant(date.to_datetime(Time::midnight()))?;
        let end = self.instant(date.to_datetime(Time::constant(23, 59, 59, 0)))?;
        Ok((start, end))
    }
}

/// Parses `raw` into a wall-clock date-time, anchored to `reference` unless
/// the string carries its own date.
///
/// Recognized shapes, tried in order:
///
/// 1. ISO-8601 `YYYY-MM-DDTHH:MM[:SS][.fff][Z]` (its own date wins)
/// 2. 12-hour `H:MM[:SS] AM|PM`, case-insensitive
/// 3. 24-hour `H:MM[:SS]`
pub fn parse_wall_clock(raw: &str, reference: Date) -> Result<DateTime> {
    let value = raw.trim();

    if let Some(iso) = parse_iso(value) {
        return Ok(iso.datetime);
    }
    if let Some(time) = parse_meridiem(value) {
        return Ok(reference.to_datetime(time));
    }
    if let Some(time) = parse_clock(value, 0..=23) {
        return Ok(reference.to_datetime(time));
    }

    Err(CoreError::InvalidTime(raw.to_string()))
}

/// Parses `raw` as in [`parse_wall_clock`] and pins it to an instant in `zone`.
pub fn to_instant(raw: &str, reference: Date, zone: &OperatingZone) -> Result<Timestamp> {
    let datetime = parse_wall_clock(raw, reference)?;
    zone.instant(datetime)
}

/// Renders a time as `h:mm AM`, the notation used for provider times.
pub fn format_twelve_hour(time: Time) -> String {
    let (hour, suffix) = match time.hour() {
        0 => (12, "AM"),
        h @ 1..=11 => (h, "AM"),
        12 => (12, "PM"),
        h => (h - 12, "PM"),
    };
    format!("{hour}:{:02} {suffix}", time.minute())
}

/// The textual family a stored time value belongs to.
///
/// Entries from different ingestion sources store pickup times in different
/// notations; an updated value is written back in the entry's own family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `YYYY-MM-DDTHH:MM:SS`, keeping the sample's date and `Z` tag.
    Iso { date: Date, utc_tag: bool },
    /// `h:mm AM`
    Meridiem,
    /// `HH:MM`
    TwentyFourHour,
}

impl TimeFormat {
    /// Classifies an existing value. Anything that is neither ISO nor
    /// AM/PM-tagged is treated as 24-hour.
    pub fn detect(sample: &str) -> Self {
        let sample = sample.trim();
        if let Some(iso) = parse_iso(sample) {
            return TimeFormat::Iso {
                date: iso.datetime.date(),
                utc_tag: iso.utc_tag,
            };
        }
        if split_meridiem(sample).is_some() {
            return TimeFormat::Meridiem;
        }
        TimeFormat::TwentyFourHour
    }

    /// Renders `time` in this family.
    pub fn render(&self, time: Time) -> String {
        match self {
            TimeFormat::Iso { date, utc_tag } => format!(
                "{date}T{:02}:{:02}:00{}",
                time.hour(),
                time.minute(),
                if *utc_tag { "Z" } else { "" }
            ),
            TimeFormat::Meridiem => format_twelve_hour(time),
            TimeFormat::TwentyFourHour => format!("{:02}:{:02}", time.hour(), time.minute()),
        }
    }
}

struct IsoReading {
    datetime: DateTime,
    utc_tag: bool,
}

fn parse_iso(value: &str) -> Option<IsoReading> {
    let (date_part, time_part) = value.split_once(['T', 't'])?;
    let date = parse_date(date_part)?;

    let (time_part, utc_tag) = match time_part.strip_suffix(['Z', 'z']) {
        Some(rest) => (rest, true),
        None => (time_part, false),
    };
    // fractional seconds are dropped
    let time_part = match time_part.split_once('.') {
        Some((whole, fraction)) if !fraction.is_empty() && is_digits(fraction) => whole,
        Some(_) => return None,
        None => time_part,
    };

    let time = parse_clock(time_part, 0..=23)?;
    Some(IsoReading {
        datetime: date.to_datetime(time),
        utc_tag,
    })
}

/// Strict `YYYY-MM-DD`.
pub(crate) fn parse_date(value: &str) -> Option<Date> {
    let mut parts = value.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    if !(is_digits(year) && is_digits(month) && is_digits(day)) {
        return None;
    }
    Date::new(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?).ok()
}

fn split_meridiem(value: &str) -> Option<(&str, bool)> {
    if value.len() < 2 || !value.is_char_boundary(value.len() - 2) {
        return None;
    }
    let (clock, suffix) = value.split_at(value.len() - 2);
    let is_pm = if suffix.eq_ignore_ascii_case("PM") {
        true
    } else if suffix.eq_ignore_ascii_case("AM") {
        false
    } else {
        return None;
    };
    Some((clock.trim_end(), is_pm))
}

fn parse_meridiem(value: &str) -> Option<Time> {
    let (clock, is_pm) = split_meridiem(value)?;
    let time = parse_clock(clock, 1..=12)?;
    let hour = match (time.hour(), is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Time::new(hour, time.minute(), time.second(), 0).ok()
}

/// `H:MM` or `H:MM:SS` with the hour restricted to `hours`.
fn parse_clock(value: &str, hours: std::ops::RangeInclusive<i8>) -> Option<Time> {
    let mut parts = value.split(':');
    let hour = parts.next()?;
    let minute = parts.next()?;
    let second = parts.next();
    if parts.next().is_some() {
        return None;
    }

    if hour.is_empty() || hour.len() > 2 || !is_digits(hour) {
        return None;
    }
    if minute.len() != 2 || !is_digits(minute) {
        return None;
    }
    let second: i8 = match second {
        Some(s) if s.len() == 2 && is_digits(s) => s.parse().ok()?,
        Some(_) => return None,
        None => 0,
    };

    let hour: i8 = hour.parse().ok()?;
    if !hours.contains(&hour) {
        return None;
    }
    Time::new(hour, minute.parse().ok()?, second, 0).ok()
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
