//! Clock times and trip time windows.
//!
//! Planner output and time bins use local "HH:MM" strings. Internally a
//! clock time is an integer count of minutes since midnight, so arithmetic
//! never touches string splitting. Conversion to and from "HH:MM" happens
//! only at the boundary.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

use super::error::DomainError;

/// Minutes in one day; clock arithmetic wraps at this value.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Error returned when parsing an invalid clock time string.
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

/// A wall-clock time of day without a date.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::ClockTime;
///
/// let t = ClockTime::parse_hhmm("23:50").unwrap();
/// assert_eq!(t.wrapping_add_minutes(45).to_string(), "00:35");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Midnight, "00:00".
    pub const MIDNIGHT: Self = Self { minutes: 0 };

    /// Create a clock time from minutes since midnight.
    ///
    /// Returns `None` for values of a full day or more.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self { minutes })
    }

    /// Create a clock time from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Parse "HH:MM" (a single-digit hour such as "9:05" is also accepted).
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_planner::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("9:30").is_ok());
    /// assert!(ClockTime::parse_hhmm("1430").is_err());
    /// assert!(ClockTime::parse_hhmm("24:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();
        if s.len() != 4 && s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        let colon = bytes.len() - 3;
        if bytes[colon] != b':' {
            return Err(TimeError::new("expected colon before minutes"));
        }

        let hour =
            parse_digits(&bytes[..colon]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_digits(&bytes[colon + 1..])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Parse a classifier time range such as "17:00–19:00".
    ///
    /// En dash, hyphen, em dash and "to" are accepted as separators. Text
    /// with no separator is read as a single time used for both ends.
    pub fn parse_range(s: &str) -> Result<(Self, Self), TimeError> {
        for sep in ['–', '-', '—'] {
            if let Some((start, end)) = s.split_once(sep) {
                return Ok((Self::parse_hhmm(start)?, Self::parse_hhmm(end)?));
            }
        }
        if let Some((start, end)) = s.split_once("to") {
            return Ok((Self::parse_hhmm(start)?, Self::parse_hhmm(end)?));
        }

        let single = Self::parse_hhmm(s)?;
        Ok((single, single))
    }

    /// The local clock time of an instant, in that instant's own offset.
    pub fn of(instant: &DateTime<FixedOffset>) -> Self {
        Self {
            minutes: (instant.hour() * 60 + instant.minute()) as u16,
        }
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u16 {
        self.minutes
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }

    /// Add minutes, wrapping around midnight. The day is dropped.
    pub fn wrapping_add_minutes(self, minutes: i64) -> Self {
        let day = i64::from(MINUTES_PER_DAY);
        let total = (i64::from(self.minutes) + minutes.rem_euclid(day)) % day;
        Self {
            minutes: total as u16,
        }
    }

    /// Converts to a `NaiveTime` with zero seconds.
    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse one or two ASCII digit bytes into a u32.
fn parse_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 2 {
        return None;
    }
    bytes.iter().try_fold(0u32, |acc, b| {
        let digit = (*b as char).to_digit(10)?;
        Some(acc * 10 + digit)
    })
}

/// Parse an ISO-8601 timestamp.
///
/// Timestamps carrying `Z` or an explicit offset keep it. Naive timestamps
/// are assumed to be UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, DomainError> {
    let trimmed = s.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant);
    }

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    let mut last_error = None;
    for format in NAIVE_FORMATS {
        match NaiveDateTime::parse_from_str(trimmed, format) {
            Ok(naive) => return Ok(naive.and_utc().fixed_offset()),
            Err(e) => last_error = Some(e),
        }
    }

    Err(DomainError::InvalidTimestamp {
        value: s.to_string(),
        reason: last_error.map_or_else(|| "unrecognised format".to_string(), |e| e.to_string()),
    })
}

/// The allowed time span of a trip.
///
/// Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// Create a window, rejecting an end before the start.
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidWindow(format!(
                "end {} is before start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two ISO-8601 timestamps.
    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        let start = parse_timestamp(start).map_err(|e| DomainError::InvalidWindow(e.to_string()))?;
        let end = parse_timestamp(end).map_err(|e| DomainError::InvalidWindow(e.to_string()))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// Calendar date of the start, in the start's offset.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Whole minutes between start and end.
    pub fn duration_mins(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_minutes()
    }

    /// Returns true if `instant` lies inside the window, both ends inclusive.
    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    /// Place a clock time on the given date, in the start's offset.
    pub fn at(&self, date: NaiveDate, clock: ClockTime) -> Result<DateTime<FixedOffset>, DomainError> {
        date.and_time(clock.to_naive_time())
            .and_local_timezone(*self.start.offset())
            .single()
            .ok_or_else(|| DomainError::InvalidTimestamp {
                value: format!("{date} {clock}"),
                reason: "not representable in the window's offset".to_string(),
            })
    }

    /// Place a clock time on the start's calendar date.
    pub fn on_start_date(&self, clock: ClockTime) -> Result<DateTime<FixedOffset>, DomainError> {
        self.at(self.start_date(), clock)
    }

    /// The start shifted by `minutes`.
    pub fn start_plus(&self, minutes: i64) -> Option<DateTime<FixedOffset>> {
        self.start.checked_add_signed(Duration::minutes(minutes))
    }
}
