//! Monday-to-Sunday week ranges for the home dashboard.

use chrono::Datelike;

use crate::date_key::DateKey;

/// Inclusive Monday..Sunday range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: DateKey,
    pub end: DateKey,
}

impl WeekRange {
    /// The week that contains `day`.
    pub fn week_of(day: DateKey) -> Self {
        let back = i64::from(day.date().weekday().num_days_from_monday());
        let start = day.add_days(-back);
        Self {
            start,
            end: start.add_days(6),
        }
    }

    pub fn contains(&self, day: DateKey) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = DateKey> + '_ {
        (0..7).map(move |i| self.start.add_days(i))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn key(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    #[test]
    fn test_week_of_midweek() {
        let week = WeekRange::week_of(key("2026-10-21"));
        assert_eq!(week.start, key("2026-10-19"));
        assert_eq!(week.end, key("2026-10-25"));
    }

    #[test]
    fn test_sunday_belongs_to_preceding_monday() {
        let week = WeekRange::week_of(key("2026-10-25"));
        assert_eq!(week.start, key("2026-10-19"));
        assert!(week.contains(key("2026-10-25")));
        assert!(!week.contains(key("2026-10-26")));
    }

    #[test]
    fn test_week_spans_month_boundary() {
        let week = WeekRange::week_of(key("2026-01-01"));
        assert_eq!(week.start, key("2025-12-29"));
        let days: Vec<String> = week.days().map(|d| d.to_string()).collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[6], "2026-01-04");
    }
}
