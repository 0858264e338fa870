use chrono::NaiveDate;
use hebrew_calendar::{EventCategory, Language, Locale, events_on};

fn on(y: i32, m: u32, d: u32, locale: Locale) -> Vec<(EventCategory, String)> {
    let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
    events_on(date, locale)
        .unwrap()
        .into_iter()
        .map(|e| (e.category(), e.description().to_string()))
        .collect()
}

#[test]
fn rosh_hashana_is_a_festival() {
    let events = events_on(NaiveDate::from_ymd_opt(2023, 9, 16).unwrap(), Locale::Israel).unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].is_major_festival());
    assert_eq!(events[0].description(), "Rosh Hashana 5784");
    assert_eq!(events[0].rendered_name(Language::Hebrew), "ראש השנה");
}

#[test]
fn plain_cheshvan_day_has_no_events() {
    assert!(on(2023, 11, 1, Locale::Israel).is_empty());
}

#[test]
fn chanukah_is_a_minor_holiday() {
    let events = on(2023, 12, 8, Locale::Israel);
    assert_eq!(
        events,
        vec![(EventCategory::MinorHoliday, "Chanukah: 2 Candles".to_string())]
    );
}

#[test]
fn chanukah_precedes_rosh_chodesh_tevet() {
    let events = on(2023, 12, 13, Locale::Israel);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].1, "Chanukah: 7 Candles");
    assert_eq!(
        events[1],
        (EventCategory::RoshChodesh, "Rosh Chodesh Tevet".to_string())
    );
}

#[test]
fn purim_in_leap_year_falls_in_adar_ii() {
    let events = on(2024, 3, 24, Locale::Israel);
    assert_eq!(events, vec![(EventCategory::MinorHoliday, "Purim".to_string())]);
    let katan = on(2024, 2, 23, Locale::Israel);
    assert_eq!(
        katan,
        vec![(EventCategory::MinorHoliday, "Purim Katan".to_string())]
    );
}

#[test]
fn taanit_esther_moves_to_thursday_when_on_shabbat() {
    // 13 Adar II 5784 was a Saturday.
    assert!(on(2024, 3, 23, Locale::Israel).is_empty());
    assert_eq!(
        on(2024, 3, 21, Locale::Israel),
        vec![(EventCategory::MinorFast, "Ta'anit Esther".to_string())]
    );
}

#[test]
fn second_festival_day_depends_on_locale() {
    let israel = on(2023, 10, 1, Locale::Israel);
    assert_eq!(israel[0].0, EventCategory::CholHamoed);
    let diaspora = on(2023, 10, 1, Locale::Diaspora);
    assert_eq!(
        diaspora,
        vec![(EventCategory::Chag, "Sukkot II".to_string())]
    );
    assert!(on(2023, 10, 8, Locale::Israel).is_empty());
    assert_eq!(on(2023, 10, 8, Locale::Diaspora)[0].1, "Simchat Torah");
}

#[test]
fn rosh_chodesh_spans_thirtieth_and_first() {
    assert_eq!(
        on(2023, 10, 15, Locale::Israel),
        vec![(EventCategory::RoshChodesh, "Rosh Chodesh Cheshvan".to_string())]
    );
    assert_eq!(
        on(2023, 10, 16, Locale::Israel),
        vec![(EventCategory::RoshChodesh, "Rosh Chodesh Cheshvan".to_string())]
    );
}

#[test]
fn omer_count_follows_holidays() {
    let lag = on(2024, 5, 26, Locale::Israel);
    assert_eq!(lag[0], (EventCategory::MinorHoliday, "Lag BaOmer".to_string()));
    assert_eq!(lag[1], (EventCategory::Omer, "33rd day of the Omer".to_string()));

    let chol = on(2024, 4, 24, Locale::Israel);
    assert_eq!(chol[0].0, EventCategory::CholHamoed);
    assert_eq!(chol[1], (EventCategory::Omer, "1st day of the Omer".to_string()));
}

#[test]
fn tisha_bav_is_a_major_fast_not_a_festival() {
    let events = events_on(NaiveDate::from_ymd_opt(2024, 8, 13).unwrap(), Locale::Israel).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].category(), EventCategory::MajorFast);
    assert!(!events[0].is_major_festival());
    assert!(!events[0].is_minor_fast());
}
