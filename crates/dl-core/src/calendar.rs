//! Calendar used to bucket events into days.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, Utc};
use thiserror::Error;

/// The calendar a day bucket is computed in.
///
/// Day buckets depend on the wall clock of whoever logged the event, so the
/// same instant can land on different days under different calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Calendar {
    /// The system's local time zone.
    #[default]
    Local,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
}

/// Error for unparseable calendar specifications.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid UTC offset {0:?}, expected `local`, `UTC` or `+HH:MM`")]
pub struct InvalidOffset(String);

impl Calendar {
    /// A calendar pinned to UTC.
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// Calendar day of `timestamp`.
    pub fn day_of(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        self.wall_clock(timestamp).date()
    }

    /// Wall-clock date and time of `timestamp`.
    pub fn wall_clock(&self, timestamp: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Local => timestamp.with_timezone(&Local).naive_local(),
            Self::Fixed(offset) => timestamp.with_timezone(offset).naive_local(),
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for Calendar {
    type Err = InvalidOffset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(Self::utc());
        }
        parse_offset(trimmed)
            .map(Self::Fixed)
            .ok_or_else(|| InvalidOffset(s.to_string()))
    }
}

/// Parses `+HH`, `+HHMM` or `+HH:MM` (and the `-` forms).
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !matches!(digits.len(), 2 | 4) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = if digits.len() == 4 {
        digits[2..].parse().ok()?
    } else {
        0
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
