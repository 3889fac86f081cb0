//! Calendar and date logic for FamHub.
//!
//! Date keys, all-day/timed schedule values and their ordering, month grid
//! layout with holiday marking, and the NEW-badge window. Nothing here does
//! I/O apart from reading the local clock.

pub mod date_key;
pub mod error;
pub mod freshness;
pub mod holidays;
pub mod month_grid;
pub mod schedule;
pub mod time_of_day;
pub mod week;

pub use date_key::{DateKey, DateParts};
pub use error::CalendarError;
pub use freshness::{is_fresh, Freshness, DEFAULT_WINDOW_HOURS};
pub use holidays::HolidaySet;
pub use month_grid::{DayCell, DayTone, MonthGrid, WEEKDAY_HEADERS};
pub use schedule::ScheduleEntry;
pub use time_of_day::{TimeOfDay, ALL_DAY, DEFAULT_STEP_MINUTES};
pub use week::WeekRange;
