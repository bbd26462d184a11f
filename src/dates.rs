//! Calendar helpers for set timestamps.
//!
//! `format_date` renders the compact `YYYYMMDD` key used to group sets by
//! day, and `is_today` compares a date against a [`Clock`] so callers can
//! pin "now" in tests.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Unparseable date: {0:?}")]
    Unparseable(String),
}

/// Source of the current local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the machine's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// A clock stopped at noon on `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN) + chrono::Duration::hours(12))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn format_date<D: Datelike>(date: &D) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

/// True when `date` falls on the clock's current calendar day.
pub fn is_today<D: Datelike, C: Clock + ?Sized>(date: &D, clock: &C) -> bool {
    let today = clock.today();
    date.year() == today.year() && date.month() == today.month() && date.day() == today.day()
}

/// Parse a date-like string into local wall-clock time.
///
/// RFC 3339 input is converted to the local zone; offset-less input is
/// taken as already local. Date-only input resolves to midnight.
pub fn parse_date_like(input: &str) -> Result<NaiveDateTime, DateError> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| DateError::Unparseable(input.to_string()))
}

pub fn format_date_str(input: &str) -> Result<String, DateError> {
    parse_date_like(input).map(|dt| format_date(&dt))
}

pub fn is_today_str<C: Clock + ?Sized>(input: &str, clock: &C) -> Result<bool, DateError> {
    parse_date_like(input).map(|dt| is_today(&dt, clock))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_date_pads_month_and_day() {
        assert_eq!(format_date(&date(2024, 3, 7)), "20240307");
        assert_eq!(format_date(&date(2024, 12, 31)), "20241231");
    }

    #[test]
    fn test_format_date_pads_year() {
        assert_eq!(format_date(&date(987, 1, 2)), "09870102");
    }

    #[test]
    fn test_format_date_ignores_time_of_day() {
        let late = date(2024, 3, 7).and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(format_date(&late), "20240307");
    }

    #[test]
    fn test_format_date_str() {
        assert_eq!(format_date_str("2024-03-07").unwrap(), "20240307");
        assert_eq!(format_date_str("2024-03-07T08:15:00").unwrap(), "20240307");
        assert_eq!(format_date_str("2024-03-07 08:15:00").unwrap(), "20240307");
    }

    #[test]
    fn test_format_date_str_rejects_invalid() {
        assert_eq!(
            format_date_str("not a date"),
            Err(DateError::Unparseable("not a date".to_string()))
        );
        assert!(format_date_str("2024-02-30").is_err());
        assert!(format_date_str("").is_err());
    }

    #[test]
    fn test_is_today_same_day_any_time() {
        let clock = FixedClock::on(date(2024, 3, 7));

        assert!(is_today(&date(2024, 3, 7), &clock));
        assert!(is_today(&date(2024, 3, 7).and_hms_opt(0, 0, 0).unwrap(), &clock));
        assert!(is_today(&date(2024, 3, 7).and_hms_opt(23, 59, 59).unwrap(), &clock));
    }

    #[test]
    fn test_is_today_any_component_differs() {
        let clock = FixedClock::on(date(2024, 3, 7));

        assert!(!is_today(&date(2023, 3, 7), &clock));
        assert!(!is_today(&date(2024, 4, 7), &clock));
        assert!(!is_today(&date(2024, 3, 8), &clock));
    }

    #[test]
    fn test_is_today_str() {
        let clock = FixedClock::on(date(2024, 3, 7));

        assert_eq!(is_today_str("2024-03-07T06:00:00", &clock), Ok(true));
        assert_eq!(is_today_str("2024-03-06", &clock), Ok(false));
        assert!(is_today_str("soon", &clock).is_err());
    }

    #[test]
    fn test_system_clock_today_is_today() {
        let before = Local::now().date_naive();
        let hit = is_today(&before, &SystemClock);
        let after = Local::now().date_naive();

        // a miss is only allowed across a midnight rollover
        assert!(hit || before != after);
    }

    #[test]
    fn test_rfc3339_converted_to_local() {
        let parsed = parse_date_like("2024-03-07T12:00:00Z").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-03-07T12:00:00Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parsed, expected);
    }
}
