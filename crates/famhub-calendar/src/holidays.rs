//! Public holiday lookup.
//!
//! The built-in list is a literal per year and has to be extended by hand
//! every December; extra dates can also come from configuration.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use chrono::Datelike;

use crate::date_key::DateKey;

/// Korean public holidays, including substitute and election days.
const KOREAN_HOLIDAYS: &[(i32, u32, u32)] = &[
    // 2025
    (2025, 1, 1),
    (2025, 1, 27),
    (2025, 1, 28),
    (2025, 1, 29),
    (2025, 1, 30),
    (2025, 3, 1),
    (2025, 3, 3),
    (2025, 5, 5),
    (2025, 5, 6),
    (2025, 6, 3),
    (2025, 6, 6),
    (2025, 8, 15),
    (2025, 10, 3),
    (2025, 10, 5),
    (2025, 10, 6),
    (2025, 10, 7),
    (2025, 10, 8),
    (2025, 10, 9),
    (2025, 12, 25),
    // 2026
    (2026, 1, 1),
    (2026, 2, 16),
    (2026, 2, 17),
    (2026, 2, 18),
    (2026, 3, 1),
    (2026, 3, 2),
    (2026, 5, 5),
    (2026, 5, 24),
    (2026, 5, 25),
    (2026, 6, 3),
    (2026, 6, 6),
    (2026, 8, 15),
    (2026, 8, 17),
    (2026, 9, 24),
    (2026, 9, 25),
    (2026, 9, 26),
    (2026, 10, 3),
    (2026, 10, 5),
    (2026, 10, 9),
    (2026, 12, 25),
];

/// An immutable set of holiday dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: BTreeSet<DateKey>,
}

impl HolidaySet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in Korean list.
    pub fn korea() -> Self {
        Self::from_keys(
            KOREAN_HOLIDAYS
                .iter()
                .filter_map(|&(y, m, d)| DateKey::from_ymd(y, m, d)),
        )
    }

    /// Shared instance of the built-in list.
    pub fn builtin() -> &'static HolidaySet {
        static BUILTIN: OnceLock<HolidaySet> = OnceLock::new();
        BUILTIN.get_or_init(Self::korea)
    }

    pub fn from_keys<I: IntoIterator<Item = DateKey>>(keys: I) -> Self {
        Self {
            dates: keys.into_iter().collect(),
        }
    }

    /// Add configured dates. Malformed keys are logged and skipped.
    pub fn with_extra<'a, I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for raw in keys {
            match DateKey::parse(raw) {
                Ok(key) => {
                    self.dates.insert(key);
                }
                Err(e) => tracing::warn!("Ignoring holiday entry: {}", e),
            }
        }
        self
    }

    pub fn contains(&self, key: DateKey) -> bool {
        self.dates.contains(&key)
    }

    /// True if at least one holiday is listed for `year`. A year with no
    /// entries most likely means the list has not been extended yet.
    pub fn covers_year(&self, year: i32) -> bool {
        self.dates.iter().any(|d| d.date().year() == year)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
