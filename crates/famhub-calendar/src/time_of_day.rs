//! Schedule times: an all-day sentinel or a wall-clock `HH:MM`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CalendarError;

/// Wire value of the all-day sentinel.
pub const ALL_DAY: &str = "ALL_DAY";

/// Default picker granularity in minutes.
pub const DEFAULT_STEP_MINUTES: u32 = 10;

/// Time of a schedule entry.
///
/// Variant order is significant: `AllDay` sorts before every `At`, and `At`
/// values sort chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TimeOfDay {
    #[default]
    AllDay,
    At(NaiveTime),
}

impl TimeOfDay {
    /// A timed value; `None` if hour or minute is out of range.
    pub fn at(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self::At)
    }

    /// Parse `ALL_DAY`, an empty string, `HH:MM`, or `HH:MM:SS` as returned
    /// by SQL `time` columns. Seconds are dropped.
    pub fn parse(raw: &str) -> Result<Self, CalendarError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ALL_DAY {
            return Ok(Self::AllDay);
        }

        let invalid = || CalendarError::InvalidTimeOfDay(raw.to_string());
        let bytes = trimmed.as_bytes();
        let format = match bytes.len() {
            5 => "%H:%M",
            // chrono reads second 60 as a leap second; a column value never is one.
            8 if bytes[5] == b':' && bytes[6] < b'6' => "%H:%M:%S",
            _ => return Err(invalid()),
        };
        let shape_ok = bytes.iter().enumerate().all(|(i, b)| {
            if i % 3 == 2 {
                *b == b':'
            } else {
                b.is_ascii_digit()
            }
        });
        if !shape_ok {
            return Err(invalid());
        }

        let time = NaiveTime::parse_from_str(trimmed, format).map_err(|_| invalid())?;
        Self::at(time.hour(), time.minute()).ok_or_else(invalid)
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay)
    }

    /// True if the value is selectable on a picker with `step`-minute slots.
    pub fn is_on_grid(&self, step: u32) -> bool {
        match self {
            Self::AllDay => true,
            Self::At(t) => step > 0 && t.second() == 0 && t.minute() % step == 0,
        }
    }

    /// Reject values that are not on the picker grid.
    pub fn ensure_on_grid(self, step: u32) -> Result<Self, CalendarError> {
        if self.is_on_grid(step) {
            Ok(self)
        } else {
            Err(CalendarError::OffGrid {
                time: self.to_string(),
                step,
            })
        }
    }

    /// Every selectable value: all-day first, then `00:00` onward in
    /// `step`-minute increments. A step that does not divide an hour yields
    /// only the all-day entry.
    pub fn slots(step: u32) -> Vec<Self> {
        let mut slots = vec![Self::AllDay];
        if step == 0 || 60 % step != 0 {
            return slots;
        }
        for hour in 0..24 {
            for minute in (0..60).step_by(step as usize) {
                slots.extend(Self::at(hour, minute));
            }
        }
        slots
    }

    /// Human label for list rendering.
    pub fn label(&self) -> String {
        match self {
            Self::AllDay => "All day".to_string(),
            Self::At(t) => t.format("%H:%M").to_string(),
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllDay => f.write_str(ALL_DAY),
            Self::At(t) => write!(f, "{}", t.format("%H:%M")),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Self::AllDay),
            Some(raw) => Self::parse(&raw).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_all_day_sorts_first() {
        let nine = TimeOfDay::at(9, 0).unwrap();
        let midnight = TimeOfDay::at(0, 0).unwrap();
        assert!(TimeOfDay::AllDay < midnight);
        assert!(midnight < nine);
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(TimeOfDay::parse("ALL_DAY").unwrap(), TimeOfDay::AllDay);
        assert_eq!(TimeOfDay::parse("").unwrap(), TimeOfDay::AllDay);
        assert_eq!(TimeOfDay::parse("09:30").unwrap(), TimeOfDay::at(9, 30).unwrap());
        assert_eq!(TimeOfDay::parse("18:40:00").unwrap(), TimeOfDay::at(18, 40).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TimeOfDay::parse("9:30").is_err());
        assert!(TimeOfDay::parse("24:00").is_err());
        assert!(TimeOfDay::parse("12:60").is_err());
        assert!(TimeOfDay::parse("noon").is_err());
        assert!(TimeOfDay::parse("12-30").is_err());
    }

    #[test]
    fn test_parse_checks_seconds_field() {
        assert_eq!(TimeOfDay::parse("18:40:30").unwrap(), TimeOfDay::at(18, 40).unwrap());
        assert!(TimeOfDay::parse("18:40:99").is_err());
        assert!(TimeOfDay::parse("18:40:60").is_err());
        assert!(TimeOfDay::parse("18:40:5x").is_err());
        assert!(TimeOfDay::parse("18:40-00").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let t = TimeOfDay::at(7, 5).unwrap();
        assert_eq!(t.to_string(), "07:05");
        assert_eq!(TimeOfDay::parse(&t.to_string()).unwrap(), t);
        assert_eq!(TimeOfDay::AllDay.to_string(), ALL_DAY);
    }

    #[test]
    fn test_grid() {
        assert!(TimeOfDay::at(9, 50).unwrap().is_on_grid(10));
        assert!(!TimeOfDay::at(9, 55).unwrap().is_on_grid(10));
        assert!(TimeOfDay::AllDay.is_on_grid(10));
        assert!(TimeOfDay::at(9, 55).unwrap().ensure_on_grid(10).is_err());
    }

    #[test]
    fn test_slots() {
        let slots = TimeOfDay::slots(DEFAULT_STEP_MINUTES);
        assert_eq!(slots.len(), 1 + 24 * 6);
        assert_eq!(slots[0], TimeOfDay::AllDay);
        assert_eq!(slots[1].to_string(), "00:00");
        assert_eq!(slots.last().unwrap().to_string(), "23:50");

        assert_eq!(TimeOfDay::slots(7), vec![TimeOfDay::AllDay]);
    }

    #[test]
    fn test_null_deserializes_as_all_day() {
        let t: TimeOfDay = serde_json::from_str("null").unwrap();
        assert_eq!(t, TimeOfDay::AllDay);
        let t: TimeOfDay = serde_json::from_str("\"13:20\"").unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"13:20\"");
    }
}
