//! Hebrew (luni-solar) calendar arithmetic used by the dedication board.
//!
//! Civil dates are exchanged through fixed day numbers: day 1 is 0001-01-01 in the
//! proleptic Gregorian calendar, which is exactly what
//! [`chrono::NaiveDate::num_days_from_ce`] returns.

mod date;
mod events;

use thiserror::Error;

pub use date::{
    HebrewDate, HebrewMonth, MAX_YEAR, MIN_YEAR, days_in_month, days_in_year, is_leap_year,
};
pub use events::{CalendarEvent, EventCategory, Language, Locale, events_on};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// The date falls outside the years this crate computes.
    #[error("{0} is outside the supported Hebrew calendar range")]
    OutOfRange(String),

    /// Day or month does not exist in the given Hebrew year.
    #[error("invalid Hebrew date: {0}")]
    InvalidDate(String),
}
