//! Month calendar layout.
//!
//! Months are zero-based (0 = January) and normalized, so `month = -1` is
//! December of the previous year and `month = 12` is January of the next.
//! Previous/next navigation therefore composes across year boundaries.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::date_key::DateKey;
use crate::error::CalendarError;
use crate::holidays::HolidaySet;

/// Display color class of a day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTone {
    Default,
    /// Saturday
    Weekend,
    /// Sunday or a listed holiday
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub date_key: DateKey,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday_index: u32,
    pub is_holiday: bool,
}

impl DayCell {
    pub fn is_sunday(&self) -> bool {
        self.weekday_index == 0
    }

    pub fn is_saturday(&self) -> bool {
        self.weekday_index == 6
    }

    /// Sundays and holidays share the warning color; a holiday that falls on
    /// a Saturday still gets the warning color.
    pub fn tone(&self) -> DayTone {
        if self.is_sunday() || self.is_holiday {
            DayTone::Warning
        } else if self.is_saturday() {
            DayTone::Weekend
        } else {
            DayTone::Default
        }
    }
}

/// Calendar cells for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    month0: u32,
    leading_blanks: u32,
    days: Vec<DayCell>,
}

/// Resolve a possibly out-of-range zero-based month into (year, month0).
pub fn normalize(year: i32, month: i32) -> (i64, u32) {
    let total = i64::from(year) * 12 + i64::from(month);
    (total.div_euclid(12), total.rem_euclid(12) as u32)
}

fn first_of_month(year: i32, month: i32) -> Option<NaiveDate> {
    let (y, m0) = normalize(year, month);
    let y = i32::try_from(y).ok()?;
    NaiveDate::from_ymd_opt(y, m0 + 1, 1)
}

impl MonthGrid {
    /// Build the grid using the built-in holiday list.
    pub fn build(year: i32, month: i32) -> Result<Self, CalendarError> {
        Self::build_with(year, month, HolidaySet::builtin())
    }

    pub fn build_with(year: i32, month: i32, holidays: &HolidaySet) -> Result<Self, CalendarError> {
        let out_of_range = || CalendarError::OutOfRange { year, month };

        let first = first_of_month(year, month).ok_or_else(out_of_range)?;
        // Day 0 of next month is the last day of this one.
        let last = first_of_month(year, month.checked_add(1).ok_or_else(out_of_range)?)
            .and_then(|next| next.pred_opt())
            .ok_or_else(out_of_range)?;

        let days = first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(|date| {
                let date_key = DateKey::from_date(date);
                DayCell {
                    day: date.day(),
                    date_key,
                    weekday_index: date.weekday().num_days_from_sunday(),
                    is_holiday: holidays.contains(date_key),
                }
            })
            .collect();

        Ok(Self {
            year: first.year(),
            month0: first.month0(),
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        })
    }

    /// Grid for the month containing `key`.
    pub fn containing(key: DateKey, holidays: &HolidaySet) -> Result<Self, CalendarError> {
        let date = key.date();
        Self::build_with(date.year(), date.month0() as i32, holidays)
    }

    pub fn prev(&self, holidays: &HolidaySet) -> Result<Self, CalendarError> {
        Self::build_with(self.year, self.month0 as i32 - 1, holidays)
    }

    pub fn next(&self, holidays: &HolidaySet) -> Result<Self, CalendarError> {
        Self::build_with(self.year, self.month0 as i32 + 1, holidays)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month.
    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn leading_blanks(&self) -> u32 {
        self.leading_blanks
    }

    pub fn days(&self) -> &[DayCell] {
        &self.days
    }

    pub fn day(&self, day: u32) -> Option<&DayCell> {
        day.checked_sub(1).and_then(|i| self.days.get(i as usize))
    }

    pub fn first_key(&self) -> Option<DateKey> {
        self.days.first().map(|c| c.date_key)
    }

    pub fn last_key(&self) -> Option<DateKey> {
        self.days.last().map(|c| c.date_key)
    }

    pub fn contains(&self, key: DateKey) -> bool {
        match (self.first_key(), self.last_key()) {
            (Some(first), Some(last)) => first <= key && key <= last,
            _ => false,
        }
    }

    /// "January 2026"
    pub fn label(&self) -> String {
        match self.days.first() {
            Some(cell) => cell.date_key.date().format("%B %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month0 + 1),
        }
    }

    /// Rows of seven cells, `None` for the blanks before day 1 and after the
    /// last day.
    pub fn weeks(&self) -> Vec<[Option<&DayCell>; 7]> {
        let mut cells: Vec<Option<&DayCell>> = (0..self.leading_blanks).map(|_| None).collect();
        cells.extend(self.days.iter().map(Some));

        cells
            .chunks(7)
            .map(|chunk| {
                let mut row = [None; 7];
                for (slot, cell) in row.iter_mut().zip(chunk) {
                    *slot = *cell;
                }
                row
            })
            .collect()
    }
}

/// Short weekday headers starting on Sunday.
pub const WEEKDAY_HEADERS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn grid(year: i32, month: i32) -> MonthGrid {
        MonthGrid::build_with(year, month, &HolidaySet::empty()).unwrap()
    }

    fn gregorian_days(year: i32, month1: u32) -> usize {
        let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
        match month1 {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ if leap => 29,
            _ => 28,
        }
    }

    #[test]
    fn test_day_counts_match_gregorian_calendar() {
        for year in [1900, 2000, 2023, 2024, 2025, 2026, 2100] {
            for month in 0..12 {
                assert_eq!(
                    grid(year, month).days().len(),
                    gregorian_days(year, month as u32 + 1),
                    "{}-{}",
                    year,
                    month + 1
                );
            }
        }
        assert_eq!(grid(2024, 1).days().len(), 29);
        assert_eq!(grid(2023, 1).days().len(), 28);
    }

    #[test]
    fn test_leading_blanks_is_weekday_of_first() {
        assert_eq!(grid(2026, 0).leading_blanks(), 4);
        for month in 0..12 {
            let g = grid(2025, month);
            assert_eq!(g.leading_blanks(), g.days()[0].weekday_index);
        }
    }

    #[test]
    fn test_month_normalization_composes() {
        assert_eq!(grid(2025, 12), grid(2026, 0));
        assert_eq!(grid(2026, -1), grid(2025, 11));
        assert_eq!(grid(2026, 25), grid(2028, 1));
        assert_eq!(grid(2026, 0).prev(&HolidaySet::empty()).unwrap(), grid(2025, 11));
        assert_eq!(grid(2025, 11).next(&HolidaySet::empty()).unwrap(), grid(2026, 0));
    }

    #[test]
    fn test_cells_carry_keys_and_weekdays() {
        let g = grid(2026, 2);
        let fifth = g.day(5).unwrap();
        assert_eq!(fifth.date_key.to_string(), "2026-03-05");
        assert_eq!(fifth.weekday_index, 4);
        assert!(g.day(0).is_none());
        assert!(g.day(32).is_none());
        assert_eq!(g.first_key().unwrap().to_string(), "2026-03-01");
        assert_eq!(g.last_key().unwrap().to_string(), "2026-03-31");
    }

    #[test]
    fn test_tones() {
        let holidays = HolidaySet::empty().with_extra(["2026-01-01", "2026-01-03"]);
        let g = MonthGrid::build_with(2026, 0, &holidays).unwrap();

        // Thursday holiday
        assert_eq!(g.day(1).unwrap().tone(), DayTone::Warning);
        // Friday
        assert_eq!(g.day(2).unwrap().tone(), DayTone::Default);
        // Saturday holiday
        assert!(g.day(3).unwrap().is_saturday());
        assert_eq!(g.day(3).unwrap().tone(), DayTone::Warning);
        // Sunday
        assert_eq!(g.day(4).unwrap().tone(), DayTone::Warning);
        assert!(!g.day(4).unwrap().is_holiday);
        // Saturday
        assert_eq!(g.day(10).unwrap().tone(), DayTone::Weekend);
    }

    #[test]
    fn test_builtin_holidays_applied() {
        let g = MonthGrid::build(2026, 2).unwrap();
        assert!(g.day(1).unwrap().is_holiday);
        assert!(g.day(2).unwrap().is_holiday);
        assert!(!g.day(3).unwrap().is_holiday);
    }

    #[test]
    fn test_weeks_layout() {
        let g = grid(2026, 0);
        let weeks = g.weeks();
        assert_eq!(weeks.len(), 5);
        assert!(weeks[0][..4].iter().all(Option::is_none));
        assert_eq!(weeks[0][4].unwrap().day, 1);
        assert_eq!(weeks[4][6].unwrap().day, 31);

        // February 2026 starts on Sunday and fills exactly four rows.
        assert_eq!(grid(2026, 1).weeks().len(), 4);
    }

    #[test]
    fn test_label_and_containing() {
        let key = DateKey::parse("2026-10-19").unwrap();
        let g = MonthGrid::containing(key, &HolidaySet::empty()).unwrap();
        assert_eq!(g.label(), "October 2026");
        assert_eq!(g.month0(), 9);
        assert!(g.contains(key));
        assert!(!g.contains(DateKey::parse("2026-11-01").unwrap()));
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        assert!(MonthGrid::build_with(i32::MAX, 0, &HolidaySet::empty()).is_err());
        assert!(MonthGrid::build_with(2026, i32::MAX, &HolidaySet::empty()).is_err());
    }
}
