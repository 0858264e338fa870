//! Seam between the board and the Hebrew calendar arithmetic.

use chrono::NaiveDate;
use hebrew_calendar as luach;

pub use hebrew_calendar::{
    CalendarEvent, EventCategory, HebrewDate, HebrewMonth, Language, Locale,
};

use crate::error::BoardError;

/// The calendar operations the board consumes. Every call is pure in its arguments;
/// "now" is always passed in.
pub trait HebrewCalendarAdapter: Send + Sync {
    fn from_civil(&self, date: NaiveDate) -> Result<HebrewDate, BoardError>;

    fn to_civil(&self, date: &HebrewDate) -> Result<NaiveDate, BoardError>;

    fn events_on(&self, date: NaiveDate, locale: Locale) -> Result<Vec<CalendarEvent>, BoardError>;
}

/// Adapter backed by the `hebrew-calendar` workspace crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Luach;

impl HebrewCalendarAdapter for Luach {
    fn from_civil(&self, date: NaiveDate) -> Result<HebrewDate, BoardError> {
        Ok(HebrewDate::from_civil(date)?)
    }

    fn to_civil(&self, date: &HebrewDate) -> Result<NaiveDate, BoardError> {
        Ok(date.to_civil()?)
    }

    fn events_on(&self, date: NaiveDate, locale: Locale) -> Result<Vec<CalendarEvent>, BoardError> {
        Ok(luach::events_on(date, locale)?)
    }
}
