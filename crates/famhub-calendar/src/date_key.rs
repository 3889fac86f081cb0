//! Canonical `YYYY-MM-DD` calendar keys.
//!
//! A `DateKey` is always built from the calendar fields of a date as seen in
//! its own timezone, so a late-evening local timestamp never rolls over to the
//! next UTC day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CalendarError;

const KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar date identified by its zero-padded `YYYY-MM-DD` string.
///
/// Ordering matches lexicographic ordering of the string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

/// Calendar fields of a key; `month` and `day` are one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Key of the calendar date `dt` falls on in its own timezone.
    pub fn format<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.date_naive())
    }

    /// Key for a one-based year/month/day, `None` if no such date exists.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today's key in the host's local calendar.
    pub fn today() -> Self {
        Self::format(&Local::now())
    }

    /// Parse a key, accepting only the exact zero-padded form.
    pub fn parse(key: &str) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidDateKey(key.to_string());

        let bytes = key.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(invalid());
        }
        if !bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
        {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(key, KEY_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn parts(&self) -> DateParts {
        DateParts {
            year: self.0.year(),
            month: self.0.month(),
            day: self.0.day(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Key `days` later (or earlier, when negative). Saturates at the
    /// ends of the supported calendar.
    pub fn add_days(&self, days: i64) -> Self {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        Self(shifted.unwrap_or(self.0))
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
