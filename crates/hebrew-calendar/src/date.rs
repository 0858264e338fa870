use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::CalendarError;

/// First Hebrew year this crate converts.
pub const MIN_YEAR: i32 = 1;
/// Last Hebrew year this crate converts.
pub const MAX_YEAR: i32 = 9999;

/// Fixed day number of 1 Tishrei AM 1.
const EPOCH: i64 = -1_373_427;

const PARTS_PER_DAY: i64 = 25_920;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HebrewMonth {
    Nisan,
    Iyyar,
    Sivan,
    Tammuz,
    Av,
    Elul,
    Tishrei,
    Cheshvan,
    Kislev,
    Tevet,
    Shvat,
    /// Adar of a common year.
    Adar,
    #[serde(rename = "adar-i")]
    AdarI,
    #[serde(rename = "adar-ii")]
    AdarII,
}

impl HebrewMonth {
    /// All fourteen month names in the order they occur within a Hebrew year
    /// (Tishrei first). Only one of `Adar` / `AdarI`+`AdarII` exists in a given year.
    pub const ALL: [HebrewMonth; 14] = [
        Self::Tishrei,
        Self::Cheshvan,
        Self::Kislev,
        Self::Tevet,
        Self::Shvat,
        Self::Adar,
        Self::AdarI,
        Self::AdarII,
        Self::Nisan,
        Self::Iyyar,
        Self::Sivan,
        Self::Tammuz,
        Self::Av,
        Self::Elul,
    ];

    /// Month number counted from Nisan (Nisan = 1, Tishrei = 7, Adar II = 13).
    pub(crate) fn number(self) -> u8 {
        match self {
            Self::Nisan => 1,
            Self::Iyyar => 2,
            Self::Sivan => 3,
            Self::Tammuz => 4,
            Self::Av => 5,
            Self::Elul => 6,
            Self::Tishrei => 7,
            Self::Cheshvan => 8,
            Self::Kislev => 9,
            Self::Tevet => 10,
            Self::Shvat => 11,
            Self::Adar | Self::AdarI => 12,
            Self::AdarII => 13,
        }
    }

    pub(crate) fn from_number(number: u8, leap: bool) -> Option<Self> {
        let month = match number {
            1 => Self::Nisan,
            2 => Self::Iyyar,
            3 => Self::Sivan,
            4 => Self::Tammuz,
            5 => Self::Av,
            6 => Self::Elul,
            7 => Self::Tishrei,
            8 => Self::Cheshvan,
            9 => Self::Kislev,
            10 => Self::Tevet,
            11 => Self::Shvat,
            12 if leap => Self::AdarI,
            12 => Self::Adar,
            13 if leap => Self::AdarII,
            _ => return None,
        };
        Some(month)
    }

    /// Whether this month exists in `year`.
    pub fn exists_in(self, year: i32) -> bool {
        match self {
            Self::Adar => !is_leap_year(year),
            Self::AdarI | Self::AdarII => is_leap_year(year),
            _ => true,
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Self::Nisan => "Nisan",
            Self::Iyyar => "Iyyar",
            Self::Sivan => "Sivan",
            Self::Tammuz => "Tamuz",
            Self::Av => "Av",
            Self::Elul => "Elul",
            Self::Tishrei => "Tishrei",
            Self::Cheshvan => "Cheshvan",
            Self::Kislev => "Kislev",
            Self::Tevet => "Tevet",
            Self::Shvat => "Sh'vat",
            Self::Adar => "Adar",
            Self::AdarI => "Adar I",
            Self::AdarII => "Adar II",
        }
    }

    pub fn hebrew_name(self) -> &'static str {
        match self {
            Self::Nisan => "ניסן",
            Self::Iyyar => "אייר",
            Self::Sivan => "סיון",
            Self::Tammuz => "תמוז",
            Self::Av => "אב",
            Self::Elul => "אלול",
            Self::Tishrei => "תשרי",
            Self::Cheshvan => "חשון",
            Self::Kislev => "כסלו",
            Self::Tevet => "טבת",
            Self::Shvat => "שבט",
            Self::Adar => "אדר",
            Self::AdarI => "אדר א'",
            Self::AdarII => "אדר ב'",
        }
    }
}

impl fmt::Display for HebrewMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.english_name())
    }
}

/// Leap years carry a thirteenth month (Adar I + Adar II).
pub fn is_leap_year(year: i32) -> bool {
    (7 * i64::from(year) + 1).rem_euclid(19) < 7
}

fn last_month_number(year: i32) -> u8 {
    if is_leap_year(year) { 13 } else { 12 }
}

/// Days from the epoch to the molad-derived new year, after the first three
/// postponement rules.
fn elapsed_days(year: i32) -> i64 {
    let y = i64::from(year);
    let months = (235 * y - 234).div_euclid(19);
    let parts = 12_084 + 13_753 * months;
    let day = months * 29 + parts.div_euclid(PARTS_PER_DAY);
    if (3 * (day + 1)).rem_euclid(7) < 3 {
        day + 1
    } else {
        day
    }
}

/// Remaining postponements keeping year lengths within the allowed set.
fn year_length_correction(year: i32) -> i64 {
    let previous = elapsed_days(year - 1);
    let current = elapsed_days(year);
    let next = elapsed_days(year + 1);
    if next - current == 356 {
        2
    } else if current - previous == 382 {
        1
    } else {
        0
    }
}

fn new_year(year: i32) -> i64 {
    EPOCH + elapsed_days(year) + year_length_correction(year)
}

/// Length of a Hebrew year in days: 353-355 for common years, 383-385 for leap years.
pub fn days_in_year(year: i32) -> i64 {
    new_year(year + 1) - new_year(year)
}

fn long_cheshvan(year: i32) -> bool {
    days_in_year(year) % 10 == 5
}

fn short_kislev(year: i32) -> bool {
    days_in_year(year) % 10 == 3
}

fn days_in_month_number(number: u8, year: i32) -> u8 {
    let short = matches!(number, 2 | 4 | 6 | 10 | 13)
        || (number == 12 && !is_leap_year(year))
        || (number == 8 && !long_cheshvan(year))
        || (number == 9 && short_kislev(year));
    if short { 29 } else { 30 }
}

/// Number of days (29 or 30) in `month` of `year`.
pub fn days_in_month(month: HebrewMonth, year: i32) -> u8 {
    days_in_month_number(month.number(), year)
}

fn fixed_from_parts(year: i32, month: u8, day: u8) -> i64 {
    let mut fixed = new_year(year) + i64::from(day) - 1;
    if month < 7 {
        for m in 7..=last_month_number(year) {
            fixed += i64::from(days_in_month_number(m, year));
        }
        for m in 1..month {
            fixed += i64::from(days_in_month_number(m, year));
        }
    } else {
        for m in 7..month {
            fixed += i64::from(days_in_month_number(m, year));
        }
    }
    fixed
}

/// A validated date in the Hebrew calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HebrewDate {
    year: i32,
    month: HebrewMonth,
    day: u8,
}

impl HebrewDate {
    pub fn new(year: i32, month: HebrewMonth, day: u8) -> Result<Self, CalendarError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CalendarError::OutOfRange(format!("Hebrew year {year}")));
        }
        if !month.exists_in(year) {
            return Err(CalendarError::InvalidDate(format!(
                "{month} does not exist in {year}"
            )));
        }
        let limit = days_in_month(month, year);
        if day == 0 || day > limit {
            return Err(CalendarError::InvalidDate(format!(
                "{month} {year} has {limit} days, got day {day}"
            )));
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> HebrewMonth {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.year)
    }

    pub fn to_fixed(&self) -> i64 {
        fixed_from_parts(self.year, self.month.number(), self.day)
    }

    pub fn from_fixed(fixed: i64) -> Result<Self, CalendarError> {
        if fixed < new_year(MIN_YEAR) || fixed >= new_year(MAX_YEAR + 1) {
            return Err(CalendarError::OutOfRange(format!("fixed day {fixed}")));
        }
        let approx = ((fixed - EPOCH) * 98_496).div_euclid(35_975_351) + 1;
        // approx - 1 never overshoots the real year; the range check above bounds it.
        let mut year = (approx - 1).max(i64::from(MIN_YEAR)) as i32;
        while new_year(year + 1) <= fixed {
            year += 1;
        }
        let mut number = if fixed < fixed_from_parts(year, 1, 1) {
            7
        } else {
            1
        };
        while fixed > fixed_from_parts(year, number, days_in_month_number(number, year)) {
            number += 1;
        }
        let day = (fixed - fixed_from_parts(year, number, 1) + 1) as u8;
        let month = HebrewMonth::from_number(number, is_leap_year(year))
            .ok_or_else(|| CalendarError::InvalidDate(format!("month number {number}")))?;
        Ok(Self { year, month, day })
    }

    pub fn from_civil(date: NaiveDate) -> Result<Self, CalendarError> {
        Self::from_fixed(i64::from(date.num_days_from_ce()))
            .map_err(|_| CalendarError::OutOfRange(date.to_string()))
    }

    pub fn to_civil(&self) -> Result<NaiveDate, CalendarError> {
        i32::try_from(self.to_fixed())
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| CalendarError::OutOfRange(self.to_string()))
    }

    /// Day of the week, 0 = Sunday.
    pub(crate) fn weekday(&self) -> u8 {
        weekday_of(self.to_fixed())
    }
}

pub(crate) fn weekday_of(fixed: i64) -> u8 {
    fixed.rem_euclid(7) as u8
}

pub(crate) fn fixed_of(year: i32, month: HebrewMonth, day: u8) -> i64 {
    fixed_from_parts(year, month.number(), day)
}

pub(crate) fn next_month(month: HebrewMonth, year: i32) -> HebrewMonth {
    let number = month.number();
    let next = if number == last_month_number(year) {
        1
    } else {
        number + 1
    };
    HebrewMonth::from_number(next, is_leap_year(year)).unwrap_or(HebrewMonth::Nisan)
}

impl fmt::Display for HebrewDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day, self.month, self.year)
    }
}
