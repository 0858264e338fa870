use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::calendar::{CalendarEvent, HebrewCalendarAdapter, Language, Locale};

/// Minor holidays announced even though the calendar does not flag them as festivals.
const ANNOUNCED_MINOR_HOLIDAYS: [&str; 2] = ["Chanukah", "Purim"];

/// Picks at most one holiday label for a day.
pub struct HolidayDetector {
    calendar: Arc<dyn HebrewCalendarAdapter>,
    locale: Locale,
}

impl HolidayDetector {
    pub fn new(calendar: Arc<dyn HebrewCalendarAdapter>, locale: Locale) -> Self {
        Self { calendar, locale }
    }

    /// Hebrew name of today's holiday. Calendar failures degrade to `None`.
    pub fn detect(&self, now: NaiveDate) -> Option<String> {
        let events = match self.calendar.events_on(now, self.locale) {
            Ok(events) => events,
            Err(err) => {
                warn!(%now, error = %err, "holiday lookup failed; assuming no holiday");
                return None;
            }
        };
        let holiday = first_announced(&events)?;
        debug!(%now, description = holiday.description(), "holiday detected");
        Some(holiday.rendered_name(Language::Hebrew).to_string())
    }
}

/// First announced event in calendar order. Simultaneous qualifying events are not
/// combined.
pub fn first_announced(events: &[CalendarEvent]) -> Option<&CalendarEvent> {
    events
        .iter()
        .filter(|e| !e.is_omer_count() && !e.is_minor_fast())
        .find(|e| is_announced(e))
}

fn is_announced(event: &CalendarEvent) -> bool {
    event.is_major_festival()
        || event.is_rosh_chodesh()
        || event.is_chol_hamoed()
        || ANNOUNCED_MINOR_HOLIDAYS
            .iter()
            .any(|name| event.description().contains(name))
}
