//! Calendar-specific error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid date key: {0:?} (expected YYYY-MM-DD)")]
    InvalidDateKey(String),

    #[error("Invalid time of day: {0:?} (expected HH:MM or ALL_DAY)")]
    InvalidTimeOfDay(String),

    #[error("Time {time} is not on the {step}-minute grid")]
    OffGrid { time: String, step: u32 },

    #[error("Month {month} of year {year} is outside the supported calendar range")]
    OutOfRange { year: i32, month: i32 },
}

impl CalendarError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidDateKey(raw) => format!("Unreadable date: {}", raw),
            Self::InvalidTimeOfDay(raw) => format!("Unreadable time: {}", raw),
            Self::OffGrid { step, .. } => format!("Times must be in {}-minute steps", step),
            Self::OutOfRange { .. } => "That month cannot be shown".to_string(),
        }
    }
}
