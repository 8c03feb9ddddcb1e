//! Navitia timestamp handling.
//!
//! Navitia returns local times as compact `YYYYMMDDThhmmss` strings (no
//! separators, no offset). This module parses them strictly, formats them
//! for display as `HH:MM`, and computes whole-minute delays between a
//! scheduled and a realtime timestamp.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Error returned when a timestamp does not match `YYYYMMDDThhmmss`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct FormatError {
    input: String,
    reason: &'static str,
}

impl FormatError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }

    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A timestamp as exchanged with the Navitia API.
///
/// # Examples
///
/// ```
/// use sncf_disruptions::domain::NavitiaTime;
///
/// let t = NavitiaTime::parse("20240101T100500").unwrap();
/// assert_eq!(t.hhmm(), "10:05");
/// assert_eq!(t.to_string(), "20240101T100500");
///
/// assert!(NavitiaTime::parse("2024-01-01").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavitiaTime(NaiveDateTime);

impl NavitiaTime {
    /// Parse a `YYYYMMDDThhmmss` timestamp.
    ///
    /// The input must be exactly 15 ASCII characters with a `T` at
    /// position 8 and digits everywhere else, and must name a real
    /// calendar date and time of day.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        let bytes = s.as_bytes();

        if bytes.len() != 15 {
            return Err(FormatError::new(s, "expected YYYYMMDDThhmmss"));
        }

        if bytes[8] != b'T' {
            return Err(FormatError::new(s, "expected 'T' at position 8"));
        }

        if !bytes[..8].iter().chain(&bytes[9..]).all(u8::is_ascii_digit) {
            return Err(FormatError::new(s, "expected digits around 'T'"));
        }

        let year = parse_digits(&bytes[0..4]) as i32;
        let month = parse_digits(&bytes[4..6]);
        let day = parse_digits(&bytes[6..8]);
        let hour = parse_digits(&bytes[9..11]);
        let minute = parse_digits(&bytes[11..13]);
        let second = parse_digits(&bytes[13..15]);

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| FormatError::new(s, "no such calendar date"))?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| FormatError::new(s, "time of day out of range"))?;

        Ok(Self(date.and_time(time)))
    }

    /// Wrap a chrono datetime, dropping any sub-second part.
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }

    /// Converts to a NaiveDateTime.
    pub fn to_datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Format as `HH:MM` for display.
    pub fn hhmm(&self) -> String {
        format!("{:02}:{:02}", self.0.hour(), self.0.minute())
    }

    /// Whole minutes elapsed from `base` to `self`, truncated toward zero.
    ///
    /// Negative when `self` is before `base`.
    pub fn minutes_since(&self, base: NavitiaTime) -> i64 {
        self.0.signed_duration_since(base.0).num_seconds() / 60
    }
}

impl fmt::Debug for NavitiaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NavitiaTime({self})")
    }
}

impl fmt::Display for NavitiaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}T{:02}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day(),
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

/// Parse a run of ASCII digits already checked by the caller.
fn parse_digits(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, &b| acc * 10 + u32::from(b - b'0'))
}

/// Reformat a Navitia timestamp as `HH:MM`.
///
/// # Examples
///
/// ```
/// use sncf_disruptions::domain::format_time;
///
/// assert_eq!(format_time("20240101T075900").unwrap(), "07:59");
/// assert!(format_time("2024-01-01").is_err());
/// ```
pub fn format_time(s: &str) -> Result<String, FormatError> {
    Ok(NavitiaTime::parse(s)?.hhmm())
}

/// Delay in whole minutes of `realtime` relative to `base`.
///
/// Positive when late, zero when on time, negative when early.
pub fn delay_minutes(base: &str, realtime: &str) -> Result<i64, FormatError> {
    let base = NavitiaTime::parse(base)?;
    let realtime = NavitiaTime::parse(realtime)?;
    Ok(realtime.minutes_since(base))
}
