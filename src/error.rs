use thiserror::Error;

use hebrew_calendar::CalendarError;

/// Library error type for the dedication board's date engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Calendar conversion outside the supported epoch.
    #[error("date out of range: {0}")]
    OutOfRangeDate(String),

    /// A picker token (day, month or year) is not in its lookup table.
    #[error("unrecognised {part} `{value}`")]
    UnresolvedDatePart { part: DatePart, value: String },

    /// All parts resolved but the combination does not exist (e.g. Adar I in a common year).
    #[error("invalid Hebrew date: {0}")]
    InvalidHebrewDate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Day,
    Month,
    Year,
    CivilDate,
}

impl std::fmt::Display for DatePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
            Self::CivilDate => "civil date",
        })
    }
}

impl From<CalendarError> for BoardError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::OutOfRange(what) => Self::OutOfRangeDate(what),
            CalendarError::InvalidDate(what) => Self::InvalidHebrewDate(what),
        }
    }
}
