//! Hebrew date strings: the canonical `"<day> ב<month> <year>"` layout, the
//! year-independent day/month comparison built on that layout, and the bounded
//! enumerations behind the admin date picker.
//!
//! The formatter and [`DayMonthKey`] share the token tables below so the stored
//! layout and the comparison cannot drift apart.

use std::ops::RangeInclusive;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use crate::calendar::{HebrewCalendarAdapter, HebrewDate, HebrewMonth};
use crate::error::{BoardError, DatePart};
use crate::gematria;

/// Day-of-month numerals, 1..=30. Fifteen and sixteen use the traditional ט"ו / ט"ז.
pub const DAY_ORDINALS: [&str; 30] = [
    "א'", "ב'", "ג'", "ד'", "ה'", "ו'", "ז'", "ח'", "ט'", "י'", "י\"א", "י\"ב", "י\"ג",
    "י\"ד", "ט\"ו", "ט\"ז", "י\"ז", "י\"ח", "י\"ט", "כ'", "כ\"א", "כ\"ב", "כ\"ג", "כ\"ד",
    "כ\"ה", "כ\"ו", "כ\"ז", "כ\"ח", "כ\"ט", "ל'",
];

/// The "in" particle prefixed to the month name.
const MONTH_PREFIX: char = 'ב';

fn day_ordinal(day: u8) -> &'static str {
    DAY_ORDINALS
        .get(usize::from(day).wrapping_sub(1))
        .copied()
        .unwrap_or_default()
}

/// Replace Hebrew geresh/gershayim with the ASCII marks used in stored strings.
fn normalize_marks(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| match c {
            '׳' => '\'',
            '״' => '"',
            other => other,
        })
        .collect()
}

/// Render a Hebrew date in the stored/displayed layout, e.g. `ט"ו בשבט תשפ"ה`.
pub fn format(date: &HebrewDate) -> String {
    format!(
        "{} {}{} {}",
        day_ordinal(date.day()),
        MONTH_PREFIX,
        date.month().hebrew_name(),
        gematria::encode(date.year())
    )
}

/// Year-independent key for "same Hebrew day and month".
///
/// Built from the first two whitespace tokens of a formatted date. Adar, Adar I and
/// Adar II all yield the `באדר` token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DayMonthKey {
    day: String,
    month: String,
}

impl DayMonthKey {
    pub fn of(date: &HebrewDate) -> Self {
        let month = date
            .month()
            .hebrew_name()
            .split_whitespace()
            .next()
            .unwrap_or_default();
        Self {
            day: day_ordinal(date.day()).to_string(),
            month: format!("{MONTH_PREFIX}{month}"),
        }
    }

    /// Parse a stored string; `None` when it has fewer than two tokens.
    pub fn parse(formatted: &str) -> Option<Self> {
        let normalized = normalize_marks(formatted);
        let mut tokens = normalized.split_whitespace();
        let day = tokens.next()?.to_string();
        let month = tokens.next()?.to_string();
        Some(Self { day, month })
    }
}

/// What the admin picker resolved a day/month/year selection to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerResolution {
    pub civil: NaiveDate,
    pub hebrew: HebrewDate,
    pub formatted: String,
    /// The selection could not be resolved and today was used instead.
    pub fell_back: bool,
}

pub struct HebrewDateFormatter {
    calendar: Arc<dyn HebrewCalendarAdapter>,
    picker_years: RangeInclusive<i32>,
}

impl HebrewDateFormatter {
    pub fn new(
        calendar: Arc<dyn HebrewCalendarAdapter>,
        picker_years: RangeInclusive<i32>,
    ) -> Self {
        Self {
            calendar,
            picker_years,
        }
    }

    pub fn format(&self, date: &HebrewDate) -> String {
        format(date)
    }

    pub fn today(&self, today: NaiveDate) -> Result<HebrewDate, BoardError> {
        self.calendar.from_civil(today)
    }

    pub fn today_formatted(&self, today: NaiveDate) -> Result<String, BoardError> {
        Ok(format(&self.today(today)?))
    }

    /// Hebrew string for the admin form's civil date field. Blank input stays blank.
    pub fn format_civil(&self, civil: &str) -> Result<String, BoardError> {
        let civil = civil.trim();
        if civil.is_empty() {
            return Ok(String::new());
        }
        let date = NaiveDate::parse_from_str(civil, "%Y-%m-%d").map_err(|_| {
            BoardError::UnresolvedDatePart {
                part: DatePart::CivilDate,
                value: civil.to_string(),
            }
        })?;
        Ok(format(&self.calendar.from_civil(date)?))
    }

    pub fn enumerate_days(&self) -> Vec<&'static str> {
        DAY_ORDINALS.to_vec()
    }

    /// All fourteen month names; leap-year validity is checked on conversion.
    pub fn enumerate_months(&self) -> Vec<&'static str> {
        HebrewMonth::ALL.iter().map(|m| m.hebrew_name()).collect()
    }

    /// Gematria years from `end` down to `start`.
    pub fn enumerate_years(&self, start: i32, end: i32) -> Vec<String> {
        (start..=end).rev().map(gematria::encode).collect()
    }

    /// [`Self::enumerate_years`] over the configured picker range.
    pub fn picker_years(&self) -> Vec<String> {
        self.enumerate_years(*self.picker_years.start(), *self.picker_years.end())
    }

    /// Resolve picker strings. The year must be exactly one of [`Self::picker_years`].
    pub fn parse_parts(
        &self,
        day: &str,
        month: &str,
        year: &str,
    ) -> Result<HebrewDate, BoardError> {
        let day_text = normalize_marks(day);
        let month_text = normalize_marks(month);
        let year_text = normalize_marks(year);

        let day_number = DAY_ORDINALS
            .iter()
            .position(|d| *d == day_text)
            .map(|idx| idx as u8 + 1)
            .ok_or_else(|| BoardError::UnresolvedDatePart {
                part: DatePart::Day,
                value: day.to_string(),
            })?;
        let month_value = HebrewMonth::ALL
            .into_iter()
            .find(|m| m.hebrew_name() == month_text)
            .ok_or_else(|| BoardError::UnresolvedDatePart {
                part: DatePart::Month,
                value: month.to_string(),
            })?;
        let year_value = gematria::decode(&year_text)
            .filter(|y| self.picker_years.contains(y))
            .filter(|y| gematria::encode(*y) == year_text)
            .ok_or_else(|| BoardError::UnresolvedDatePart {
                part: DatePart::Year,
                value: year.to_string(),
            })?;

        Ok(HebrewDate::new(year_value, month_value, day_number)?)
    }

    pub fn to_civil_from_parts(
        &self,
        day: &str,
        month: &str,
        year: &str,
    ) -> Result<NaiveDate, BoardError> {
        let hebrew = self.parse_parts(day, month, year)?;
        self.calendar.to_civil(&hebrew)
    }

    /// Resolve a picker selection, falling back to `today` when it does not map to a
    /// real date. Only fails when today itself is outside the calendar's range.
    pub fn resolve_picker(
        &self,
        day: &str,
        month: &str,
        year: &str,
        today: NaiveDate,
    ) -> Result<PickerResolution, BoardError> {
        let resolved = self
            .parse_parts(day, month, year)
            .and_then(|hebrew| Ok((self.calendar.to_civil(&hebrew)?, hebrew)));
        match resolved {
            Ok((civil, hebrew)) => Ok(PickerResolution {
                civil,
                formatted: format(&hebrew),
                hebrew,
                fell_back: false,
            }),
            Err(err) => {
                warn!(day, month, year, error = %err, "picker selection unresolved; using today");
                let hebrew = self.calendar.from_civil(today)?;
                Ok(PickerResolution {
                    civil: today,
                    formatted: format(&hebrew),
                    hebrew,
                    fell_back: true,
                })
            }
        }
    }
}
