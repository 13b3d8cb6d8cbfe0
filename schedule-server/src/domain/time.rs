//! Clock time handling for duty schedules.
//!
//! The scheduler provides every time twice: as an integer number of minutes
//! since midnight (the canonical sort key) and as a "HH:MM" display string.
//! Duties may run past midnight, so minute values above 1440 are valid and
//! keep counting rather than wrapping.

use chrono::Duration;
use std::fmt;

/// Minutes in a day.
const MINUTES_PER_DAY: u32 = 24 * 60;

/// Error returned when parsing an invalid time string.
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

/// A time of day expressed as minutes since midnight of the service day.
///
/// # Examples
///
/// ```
/// use schedule_server::domain::ClockTime;
///
/// let t = ClockTime::parse_hhmm("06:45").unwrap();
/// assert_eq!(t.minutes(), 405);
/// assert_eq!(t.to_string(), "06:45");
///
/// // Past midnight the display wraps but the minute count does not.
/// let late = ClockTime::from_minutes(1470);
/// assert_eq!(late.to_string(), "00:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Create a time from minutes since midnight.
    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Parse a time from "HH:MM" format.
    ///
    /// Single-digit hours ("6:05") are accepted since some producers do not
    /// pad them.
    ///
    /// ```
    /// use schedule_server::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("6:05").is_ok());
    /// assert!(ClockTime::parse_hhmm("1430").is_err());
    /// assert!(ClockTime::parse_hhmm("12:60").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let (hours, minutes) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

        if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let hour = parse_digits(hours).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute =
            parse_digits(minutes).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Ok(Self(hour * 60 + minute))
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// Hour of the day (0-23), wrapping past midnight.
    pub fn hour(&self) -> u32 {
        (self.0 % MINUTES_PER_DAY) / 60
    }

    /// Minute of the hour (0-59).
    pub fn minute(&self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse a run of ASCII digits into a u32.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Format a shift length as zero-padded "HH:MM".
///
/// A missing (malformed input) or negative span formats as "00:00" rather
/// than failing; the board still renders the row.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use schedule_server::domain::format_shift_duration;
///
/// assert_eq!(format_shift_duration(Some(Duration::minutes(495))), "08:15");
/// assert_eq!(format_shift_duration(Some(Duration::minutes(-5))), "00:00");
/// assert_eq!(format_shift_duration(None), "00:00");
/// ```
pub fn format_shift_duration(span: Option<Duration>) -> String {
    match span {
        Some(span) if span >= Duration::zero() => {
            let total = span.num_minutes();
            format!("{:02}:{:02}", total / 60, total % 60)
        }
        _ => "00:00".to_string(),
    }
}

/// The span between two raw minute values, if both are present.
pub fn span_between(start: Option<u32>, end: Option<u32>) -> Option<Duration> {
    let start = i64::from(start?);
    let end = i64::from(end?);
    Some(Duration::minutes(end - start))
}
