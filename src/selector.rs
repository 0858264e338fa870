use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::calendar::HebrewDate;
use crate::events::{DedicationItem, HolidaySlide, Slide};
use crate::hebrew_date::DayMonthKey;
use crate::holiday::HolidayDetector;

/// Greeting under the holiday name on the synthetic holiday slide.
pub const DEFAULT_HOLIDAY_GREETING: &str = "חג שמח!";

/// Filters the full item collection down to what belongs on screen today.
pub struct TodaySlideSelector {
    detector: HolidayDetector,
    greeting: String,
}

impl TodaySlideSelector {
    pub fn new(detector: HolidayDetector, greeting: impl Into<String>) -> Self {
        Self {
            detector,
            greeting: greeting.into(),
        }
    }

    /// Today's slides in input order, with a holiday slide first when one applies.
    ///
    /// `today` is `None` when the Hebrew date could not be computed; matching then
    /// falls back to civil dates only. An empty result is left for the caller to
    /// replace with the default slide.
    pub fn select(
        &self,
        items: &[DedicationItem],
        now: DateTime<Tz>,
        today: Option<&HebrewDate>,
    ) -> Vec<Slide> {
        let holiday = self.holiday(now.date_naive());
        self.assemble(items, now, today, holiday)
    }

    /// Today's holiday label, as the holiday slide would show it.
    pub fn holiday(&self, today: NaiveDate) -> Option<String> {
        self.detector.detect(today)
    }

    /// [`Self::select`] with the holiday already looked up.
    pub fn assemble(
        &self,
        items: &[DedicationItem],
        now: DateTime<Tz>,
        today: Option<&HebrewDate>,
        holiday: Option<String>,
    ) -> Vec<Slide> {
        let civil = now.date_naive().format("%Y-%m-%d").to_string();
        let key = today.map(DayMonthKey::of);
        let now_utc = now.with_timezone(&Utc);

        let mut slides: Vec<Slide> = holiday
            .map(|name| {
                Slide::Holiday(HolidaySlide {
                    main_name: name,
                    sub_text: self.greeting.clone(),
                })
            })
            .into_iter()
            .collect();
        slides.extend(
            items
                .iter()
                .filter(|item| shows_today(item, now_utc, &civil, key.as_ref()))
                .cloned()
                .map(Slide::Item),
        );
        slides
    }
}

/// Whether an item belongs to today. First matching rule wins:
/// expired → no; undated → yes; same civil date → yes; same Hebrew day and month → yes.
pub fn shows_today(
    item: &DedicationItem,
    now: DateTime<Utc>,
    civil_today: &str,
    hebrew_today: Option<&DayMonthKey>,
) -> bool {
    if item.is_expired_at(now) {
        return false;
    }
    if item.is_undated() {
        return true;
    }
    if item.civil_date() == Some(civil_today) {
        return true;
    }
    match (item.hebrew_date_text().and_then(DayMonthKey::parse), hebrew_today) {
        (Some(stored), Some(today)) => stored == *today,
        _ => false,
    }
}
