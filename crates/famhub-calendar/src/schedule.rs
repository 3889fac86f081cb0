//! Schedule entries and their display order.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::time_of_day::TimeOfDay;

/// A family calendar entry as stored in `family_schedules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: String,
    pub title: String,
    #[serde(rename = "schedule_date")]
    pub date: DateKey,
    #[serde(rename = "schedule_time", default)]
    pub time: TimeOfDay,
    pub author_id: String,
}

/// Display order: date, then all-day before timed, then time ascending.
pub fn compare(a: &ScheduleEntry, b: &ScheduleEntry) -> Ordering {
    a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time))
}

/// Sort entries for display. Stable: entries with the same date and time
/// keep the order they arrived in.
pub fn sort(mut entries: Vec<ScheduleEntry>) -> Vec<ScheduleEntry> {
    sort_in_place(&mut entries);
    entries
}

pub fn sort_in_place(entries: &mut [ScheduleEntry]) {
    entries.sort_by(compare);
}

/// Entries on `date`, in display order.
pub fn entries_on(entries: &[ScheduleEntry], date: DateKey) -> Vec<&ScheduleEntry> {
    let mut day: Vec<&ScheduleEntry> = entries.iter().filter(|e| e.date == date).collect();
    day.sort_by(|a, b| compare(a, b));
    day
}

/// Dates that have at least one entry (drives the calendar dots).
pub fn dates_with_entries(entries: &[ScheduleEntry]) -> BTreeSet<DateKey> {
    entries.iter().map(|e| e.date).collect()
}
