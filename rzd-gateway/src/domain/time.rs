//! Date and time handling for the timetable service.
//!
//! The service sends dates as `DD.MM.YYYY` and times as `HH:MM`, always as
//! separate strings, and always in its own local time (Moscow, UTC+03:00).
//! Journey durations use the same `HH:MM` shape but are elapsed times, so
//! the hour part may exceed 23.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta};

/// UTC offset the service reports all timestamps in.
pub const ENDPOINT_UTC_OFFSET_SECS: i32 = 3 * 60 * 60;

/// The service's declared timezone.
pub const ENDPOINT_TIMEZONE: FixedOffset = match FixedOffset::east_opt(ENDPOINT_UTC_OFFSET_SECS) {
    Some(offset) => offset,
    None => panic!("endpoint UTC offset out of range"),
};

/// Date format used in request bodies and responses.
const DATE_FORMAT: &str = "%d.%m.%Y";

/// Time-of-day format used in request bodies and responses.
const TIME_FORMAT: &str = "%H:%M";

/// Error returned when parsing an invalid date, time, or duration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Combine a `DD.MM.YYYY` date and an `HH:MM` time into one timestamp in the
/// service's timezone.
///
/// # Examples
///
/// ```
/// use rzd_gateway::domain::parse_timestamp;
///
/// let ts = parse_timestamp("15.03.2025", "08:45").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2025-03-15T08:45:00+03:00");
///
/// assert!(parse_timestamp("31.02.2025", "08:45").is_err());
/// assert!(parse_timestamp("15.03.2025", "8.45").is_err());
/// ```
pub fn parse_timestamp(date: &str, time: &str) -> Result<DateTime<FixedOffset>, TimeError> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;

    date.and_time(time)
        .and_local_timezone(ENDPOINT_TIMEZONE)
        .single()
        .ok_or_else(|| TimeError::new("ambiguous local time"))
}

/// Parse a `DD.MM.YYYY` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, TimeError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| TimeError::new("expected DD.MM.YYYY date"))
}

/// Parse an `HH:MM` time of day.
pub fn parse_time(s: &str) -> Result<NaiveTime, TimeError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|_| TimeError::new("expected HH:MM time"))
}

/// Parse an `HH:MM` elapsed duration.
///
/// Unlike a time of day, the hour part is unbounded: a 27 hour 5 minute
/// journey arrives as `"27:05"`.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use rzd_gateway::domain::parse_duration;
///
/// assert_eq!(parse_duration("27:05").unwrap(), TimeDelta::minutes(27 * 60 + 5));
/// assert!(parse_duration("3:75").is_err());
/// ```
pub fn parse_duration(s: &str) -> Result<TimeDelta, TimeError> {
    let (hours, minutes) = s
        .trim()
        .split_once(':')
        .ok_or_else(|| TimeError::new("expected HH:MM duration"))?;

    let hours = parse_digits(hours).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    let minutes = parse_digits(minutes).ok_or_else(|| TimeError::new("invalid minute digits"))?;

    if minutes > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    Ok(TimeDelta::hours(hours) + TimeDelta::minutes(minutes))
}

/// Format a date the way request bodies expect it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a time of day the way request bodies expect it.
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Parse a non-empty run of ASCII digits (at most 6, which bounds hours
/// well inside `TimeDelta`'s range).
fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || s.len() > 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn timestamp_in_endpoint_timezone() {
        let ts = parse_timestamp("15.03.2025", "08:45").unwrap();

        assert_eq!(ts.year(), 2025);
        assert_eq!(ts.month(), 3);
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 8);
        assert_eq!(ts.minute(), 45);
        assert_eq!(ts.offset().local_minus_utc(), ENDPOINT_UTC_OFFSET_SECS);

        // 08:45 in Moscow is 05:45 UTC
        assert_eq!(ts.naive_utc().hour(), 5);
    }

    #[test]
    fn timestamp_rejects_bad_date() {
        assert!(parse_timestamp("2025-03-15", "08:45").is_err());
        assert!(parse_timestamp("32.01.2025", "08:45").is_err());
        assert!(parse_timestamp("", "08:45").is_err());
    }

    #[test]
    fn timestamp_rejects_bad_time() {
        assert!(parse_timestamp("15.03.2025", "24:00").is_err());
        assert!(parse_timestamp("15.03.2025", "").is_err());
        assert!(parse_timestamp("15.03.2025", "noon").is_err());
    }

    #[test]
    fn duration_over_a_day() {
        assert_eq!(parse_duration("00:00").unwrap(), TimeDelta::zero());
        assert_eq!(parse_duration("03:59").unwrap(), TimeDelta::minutes(239));
        assert_eq!(parse_duration("27:05").unwrap(), TimeDelta::minutes(1625));
        assert_eq!(parse_duration("100:00").unwrap(), TimeDelta::hours(100));
    }

    #[test]
    fn duration_rejects_malformed() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("12").is_err());
        assert!(parse_duration("12:").is_err());
        assert!(parse_duration(":30").is_err());
        assert!(parse_duration("1:2:3").is_err());
        assert!(parse_duration("-1:30").is_err());
        assert!(parse_duration("01:60").is_err());
    }

    #[test]
    fn formats_request_values() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let time = NaiveTime::from_hms_opt(7, 5, 0).unwrap();

        assert_eq!(format_date(date), "05.03.2025");
        assert_eq!(format_time(time), "07:05");
    }
}
