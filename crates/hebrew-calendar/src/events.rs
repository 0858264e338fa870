use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CalendarError;
use crate::date::{HebrewDate, HebrewMonth, fixed_of, next_month, weekday_of};

const SUNDAY: u8 = 0;
const MONDAY: u8 = 1;
const THURSDAY: u8 = 4;
const FRIDAY: u8 = 5;
const SATURDAY: u8 = 6;

/// Which festival schedule applies: the diaspora keeps an extra festival day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    Diaspora,
    #[default]
    Israel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Hebrew,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    /// Yom Tov: work-restricted festival days.
    Chag,
    CholHamoed,
    RoshChodesh,
    MinorFast,
    MajorFast,
    MinorHoliday,
    ModernHoliday,
    Erev,
    Omer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    date: HebrewDate,
    category: EventCategory,
    description: String,
    hebrew: String,
}

impl CalendarEvent {
    pub fn new(
        date: HebrewDate,
        category: EventCategory,
        description: impl Into<String>,
        hebrew: impl Into<String>,
    ) -> Self {
        Self {
            date,
            category,
            description: description.into(),
            hebrew: hebrew.into(),
        }
    }

    pub fn date(&self) -> HebrewDate {
        self.date
    }

    pub fn category(&self) -> EventCategory {
        self.category
    }

    /// Stable English description, e.g. `"Chanukah: 3 Candles"`.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_major_festival(&self) -> bool {
        self.category == EventCategory::Chag
    }

    pub fn is_rosh_chodesh(&self) -> bool {
        self.category == EventCategory::RoshChodesh
    }

    pub fn is_chol_hamoed(&self) -> bool {
        self.category == EventCategory::CholHamoed
    }

    pub fn is_minor_fast(&self) -> bool {
        self.category == EventCategory::MinorFast
    }

    pub fn is_omer_count(&self) -> bool {
        self.category == EventCategory::Omer
    }

    pub fn rendered_name(&self, language: Language) -> &str {
        match language {
            Language::English => &self.description,
            Language::Hebrew => &self.hebrew,
        }
    }
}

/// Calendar events falling on a civil date.
///
/// Ordering: festival/fast/minor-holiday entries first, then Rosh Chodesh, then the
/// Omer count.
pub fn events_on(date: NaiveDate, locale: Locale) -> Result<Vec<CalendarEvent>, CalendarError> {
    let hd = HebrewDate::from_civil(date)?;
    let mut events = Vec::new();
    holidays(&hd, locale, &mut events);
    rosh_chodesh(&hd, &mut events);
    omer(&hd, &mut events);
    Ok(events)
}

const ROMAN: [&str; 8] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII"];
const HEBREW_LETTERS: [&str; 8] = ["א'", "ב'", "ג'", "ד'", "ה'", "ו'", "ז'", "ח'"];

fn holidays(hd: &HebrewDate, locale: Locale, out: &mut Vec<CalendarEvent>) {
    use EventCategory::*;
    use HebrewMonth::*;

    let year = hd.year();
    let day = hd.day();
    let weekday = hd.weekday();
    let diaspora = locale == Locale::Diaspora;
    let purim_month = if hd.is_leap_year() { AdarII } else { Adar };
    let mut push = |category, en: String, he: String| {
        out.push(CalendarEvent::new(*hd, category, en, he));
    };

    match (hd.month(), day) {
        (Tishrei, 1) => push(
            Chag,
            format!("Rosh Hashana {year}"),
            "ראש השנה".to_string(),
        ),
        (Tishrei, 2) => push(Chag, "Rosh Hashana II".into(), "ראש השנה ב'".into()),
        (Tishrei, 3) if weekday != SATURDAY => {
            push(MinorFast, "Tzom Gedaliah".into(), "צום גדליה".into())
        }
        (Tishrei, 4) if weekday == SUNDAY => {
            push(MinorFast, "Tzom Gedaliah".into(), "צום גדליה".into())
        }
        (Tishrei, 9) => push(Erev, "Erev Yom Kippur".into(), "ערב יום כפור".into()),
        (Tishrei, 10) => push(Chag, "Yom Kippur".into(), "יום כפור".into()),
        (Tishrei, 14) => push(Erev, "Erev Sukkot".into(), "ערב סוכות".into()),
        (Tishrei, 15) => push(Chag, "Sukkot I".into(), "סוכות א'".into()),
        (Tishrei, 16) if diaspora => push(Chag, "Sukkot II".into(), "סוכות ב'".into()),
        (Tishrei, 16..=20) => {
            let n = usize::from(day - 15);
            push(
                CholHamoed,
                format!("Sukkot {} (CH''M)", ROMAN[n]),
                format!("סוכות {} (חול המועד)", HEBREW_LETTERS[n]),
            )
        }
        (Tishrei, 21) => push(
            CholHamoed,
            "Sukkot VII (Hoshana Raba)".into(),
            "הושענא רבה".into(),
        ),
        (Tishrei, 22) if diaspora => push(Chag, "Shmini Atzeret".into(), "שמיני עצרת".into()),
        (Tishrei, 22) => push(
            Chag,
            "Shmini Atzeret".into(),
            "שמיני עצרת ושמחת תורה".into(),
        ),
        (Tishrei, 23) if diaspora => push(Chag, "Simchat Torah".into(), "שמחת תורה".into()),
        (Kislev, 24) => push(
            MinorHoliday,
            "Chanukah: 1 Candle".into(),
            "חנוכה: נר ראשון".into(),
        ),
        (Tevet, 10) => push(MinorFast, "Asara B'Tevet".into(), "עשרה בטבת".into()),
        (Shvat, 15) => push(MinorHoliday, "Tu BiShvat".into(), "ט\"ו בשבט".into()),
        (AdarI, 14) => push(MinorHoliday, "Purim Katan".into(), "פורים קטן".into()),
        (m, 13) if m == purim_month && weekday != SATURDAY => {
            push(MinorFast, "Ta'anit Esther".into(), "תענית אסתר".into())
        }
        (m, 11) if m == purim_month && weekday == THURSDAY => {
            push(MinorFast, "Ta'anit Esther".into(), "תענית אסתר".into())
        }
        (m, 14) if m == purim_month => push(MinorHoliday, "Purim".into(), "פורים".into()),
        (m, 15) if m == purim_month => {
            push(MinorHoliday, "Shushan Purim".into(), "שושן פורים".into())
        }
        (Nisan, 14) => push(Erev, "Erev Pesach".into(), "ערב פסח".into()),
        (Nisan, 15) => push(Chag, "Pesach I".into(), "פסח א'".into()),
        (Nisan, 16) if diaspora => push(Chag, "Pesach II".into(), "פסח ב'".into()),
        (Nisan, 16..=20) => {
            let n = usize::from(day - 15);
            push(
                CholHamoed,
                format!("Pesach {} (CH''M)", ROMAN[n]),
                format!("פסח {} (חול המועד)", HEBREW_LETTERS[n]),
            )
        }
        (Nisan, 21) => push(Chag, "Pesach VII".into(), "שביעי של פסח".into()),
        (Nisan, 22) if diaspora => push(Chag, "Pesach VIII".into(), "אחרון של פסח".into()),
        (Iyyar, 14) => push(MinorHoliday, "Pesach Sheni".into(), "פסח שני".into()),
        (Iyyar, 18) => push(MinorHoliday, "Lag BaOmer".into(), "ל\"ג בעומר".into()),
        (Sivan, 5) => push(Erev, "Erev Shavuot".into(), "ערב שבועות".into()),
        (Sivan, 6) if diaspora => push(Chag, "Shavuot I".into(), "שבועות א'".into()),
        (Sivan, 6) => push(Chag, "Shavuot".into(), "שבועות".into()),
        (Sivan, 7) if diaspora => push(Chag, "Shavuot II".into(), "שבועות ב'".into()),
        (Tammuz, 17) if weekday != SATURDAY => {
            push(MinorFast, "Tzom Tammuz".into(), "צום י\"ז בתמוז".into())
        }
        (Tammuz, 18) if weekday == SUNDAY => {
            push(MinorFast, "Tzom Tammuz".into(), "צום י\"ז בתמוז".into())
        }
        (Av, 9) if weekday != SATURDAY => push(MajorFast, "Tish'a B'Av".into(), "תשעה באב".into()),
        (Av, 10) if weekday == SUNDAY => push(MajorFast, "Tish'a B'Av".into(), "תשעה באב".into()),
        (Av, 15) => push(MinorHoliday, "Tu B'Av".into(), "ט\"ו באב".into()),
        (Elul, 29) => push(Erev, "Erev Rosh Hashana".into(), "ערב ראש השנה".into()),
        _ => {}
    }

    if let Some(n) = chanukah_day(hd) {
        if n < 8 {
            push(
                MinorHoliday,
                format!("Chanukah: {} Candles", n + 1),
                format!("חנוכה: {} נרות", n + 1),
            );
        } else {
            push(MinorHoliday, "Chanukah: 8th Day".into(), "חנוכה: יום ח'".into());
        }
    }

    let fixed = hd.to_fixed();
    if year >= 5711 && fixed == yom_hashoah(year) {
        push(ModernHoliday, "Yom HaShoah".into(), "יום השואה".into());
    }
    if year >= 5708 {
        let atzmaut = yom_haatzmaut(year);
        if fixed == atzmaut - 1 {
            push(ModernHoliday, "Yom HaZikaron".into(), "יום הזכרון".into());
        } else if fixed == atzmaut {
            push(ModernHoliday, "Yom HaAtzma'ut".into(), "יום העצמאות".into());
        }
    }
    if year >= 5727 && hd.month() == Iyyar && day == 28 {
        push(ModernHoliday, "Yom Yerushalayim".into(), "יום ירושלים".into());
    }
}

/// Day of Chanukah (1..=8) counted from 25 Kislev, which spills into Tevet.
fn chanukah_day(hd: &HebrewDate) -> Option<i64> {
    let start = fixed_of(hd.year(), HebrewMonth::Kislev, 25);
    let n = hd.to_fixed() - start + 1;
    (1..=8).contains(&n).then_some(n)
}

fn yom_hashoah(year: i32) -> i64 {
    let base = fixed_of(year, HebrewMonth::Nisan, 27);
    match weekday_of(base) {
        FRIDAY => base - 1,
        SUNDAY => base + 1,
        _ => base,
    }
}

fn yom_haatzmaut(year: i32) -> i64 {
    let base = fixed_of(year, HebrewMonth::Iyyar, 5);
    match weekday_of(base) {
        FRIDAY => base - 1,
        SATURDAY => base - 2,
        MONDAY => base + 1,
        _ => base,
    }
}

fn rosh_chodesh(hd: &HebrewDate, out: &mut Vec<CalendarEvent>) {
    let month = match hd.day() {
        30 => next_month(hd.month(), hd.year()),
        1 if hd.month() != HebrewMonth::Tishrei => hd.month(),
        _ => return,
    };
    out.push(CalendarEvent::new(
        *hd,
        EventCategory::RoshChodesh,
        format!("Rosh Chodesh {}", month.english_name()),
        format!("ראש חודש {}", month.hebrew_name()),
    ));
}

fn omer(hd: &HebrewDate, out: &mut Vec<CalendarEvent>) {
    let start = fixed_of(hd.year(), HebrewMonth::Nisan, 16);
    let n = hd.to_fixed() - start + 1;
    if !(1..=49).contains(&n) {
        return;
    }
    out.push(CalendarEvent::new(
        *hd,
        EventCategory::Omer,
        format!("{} day of the Omer", ordinal(n)),
        format!("ספירת העומר: יום {n}"),
    ));
}

fn ordinal(n: i64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(22), "22nd");
        assert_eq!(ordinal(33), "33rd");
    }

    #[test]
    fn chanukah_runs_eight_days_across_short_kislev() {
        // Kislev 5784 has 29 days, so Chanukah ends on 3 Tevet.
        let last = HebrewDate::new(5784, HebrewMonth::Tevet, 3).unwrap();
        assert_eq!(chanukah_day(&last), Some(8));
        let after = HebrewDate::new(5784, HebrewMonth::Tevet, 4).unwrap();
        assert_eq!(chanukah_day(&after), None);
    }
}
