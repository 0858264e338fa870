use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use dedication_board::calendar::{CalendarEvent, HebrewCalendarAdapter, HebrewDate, Locale, Luach};
use dedication_board::clock::OffsetClock;
use dedication_board::config::Configuration;
use dedication_board::error::BoardError;
use dedication_board::events::{
    BoardSettings, DedicationItem, DefaultSlide, DisplayFrame, ItemId, Slide,
};
use dedication_board::tasks::display::{self, SessionConfig};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

struct Harness {
    items_tx: watch::Sender<Vec<DedicationItem>>,
    settings_tx: watch::Sender<BoardSettings>,
    frames_rx: watch::Receiver<Option<DisplayFrame>>,
    cancel: CancellationToken,
    handle: JoinHandle<anyhow::Result<()>>,
    start: Instant,
}

impl Harness {
    fn spawn(
        cfg: SessionConfig,
        calendar: Arc<dyn HebrewCalendarAdapter>,
        now: &str,
        items: Vec<DedicationItem>,
    ) -> Self {
        let origin = DateTime::parse_from_rfc3339(now).unwrap().with_timezone(&Utc);
        let (items_tx, items_rx) = watch::channel(items);
        let (settings_tx, settings_rx) = watch::channel(BoardSettings::default());
        let (frames_tx, frames_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let start = Instant::now();
        let handle = tokio::spawn(display::run(
            cfg,
            calendar,
            Arc::new(OffsetClock::starting_at(origin)),
            items_rx,
            settings_rx,
            frames_tx,
            cancel.clone(),
        ));
        Self {
            items_tx,
            settings_tx,
            frames_rx,
            cancel,
            handle,
            start,
        }
    }

    async fn at(&self, ms: u64) -> DisplayFrame {
        sleep_until(self.start + Duration::from_millis(ms)).await;
        self.frames_rx
            .borrow()
            .clone()
            .expect("session published a frame")
    }

    async fn shutdown(self) {
        self.cancel.cancel();
        self.handle.await.unwrap().unwrap();
    }
}

fn session_config() -> SessionConfig {
    SessionConfig::from(&Configuration::default())
}

fn item(id: i64) -> DedicationItem {
    DedicationItem {
        id: Some(ItemId::Number(id)),
        kind: "memorial".into(),
        main_name: Some(format!("item {id}")),
        ..Default::default()
    }
}

fn dated(id: i64, date: &str) -> DedicationItem {
    DedicationItem {
        date: Some(date.into()),
        ..item(id)
    }
}

// 17 Cheshvan 5784, no holiday.
const PLAIN_DAY: &str = "2023-11-01T09:00:00Z";

#[tokio::test(start_paused = true)]
async fn rotates_with_fade_between_slides() {
    let h = Harness::spawn(
        session_config(),
        Arc::new(Luach),
        PLAIN_DAY,
        vec![item(1), item(2), item(3)],
    );

    let f = h.at(10).await;
    assert_eq!((f.index, f.total, f.visible), (0, 3, true));
    assert_eq!(f.slide.id(), "1");
    assert_eq!(f.hebrew_date, "י\"ז בחשון תשפ\"ד");
    assert_eq!(f.holiday, None);

    let f = h.at(5100).await;
    assert_eq!((f.index, f.visible), (0, false));
    let f = h.at(5790).await;
    assert_eq!((f.index, f.visible), (0, false));

    let f = h.at(5900).await;
    assert_eq!((f.index, f.visible), (1, true));
    assert_eq!(f.slide.id(), "2");

    // 10.0s fade, 10.8s -> 2; 15.0s fade, 15.8s -> wraps to 0
    let f = h.at(11_000).await;
    assert_eq!(f.index, 2);
    let f = h.at(15_900).await;
    assert_eq!((f.index, f.visible), (0, true));

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn single_slide_stays_put() {
    let h = Harness::spawn(session_config(), Arc::new(Luach), PLAIN_DAY, vec![item(1)]);
    for ms in [10, 5100, 5900, 59_000] {
        let f = h.at(ms).await;
        assert_eq!((f.index, f.total, f.visible), (0, 1, true), "at {ms}ms");
    }
    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn empty_day_shows_default_slide_until_items_arrive() {
    let h = Harness::spawn(
        session_config(),
        Arc::new(Luach),
        PLAIN_DAY,
        vec![dated(1, "2020-01-01")],
    );

    let f = h.at(10).await;
    assert_eq!(f.total, 1);
    assert_eq!(f.slide, Slide::Default(DefaultSlide::default()));
    assert_eq!(f.slide.id(), "empty");

    h.settings_tx.send_replace(BoardSettings {
        default_slide: Some(DefaultSlide {
            main_name: "ברוכים הבאים".into(),
            ..DefaultSlide::default()
        }),
        ..BoardSettings::default()
    });
    let f = h.at(20).await;
    assert_eq!(f.slide.main_name(), "ברוכים הבאים");

    h.items_tx.send_replace(vec![item(7), item(8)]);
    let f = h.at(30).await;
    assert_eq!((f.index, f.total), (0, 2));
    assert_eq!(f.slide.id(), "7");

    // Re-armed when the items arrived at 20ms.
    let f = h.at(5_000).await;
    assert!(f.visible);
    let f = h.at(5_900).await;
    assert_eq!((f.index, f.visible), (1, true));

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn settings_interval_rearms_rotation() {
    let h = Harness::spawn(session_config(), Arc::new(Luach), PLAIN_DAY, vec![item(1), item(2)]);
    h.at(10).await;

    h.settings_tx.send_replace(BoardSettings {
        slide_duration: Some(2000),
        ..BoardSettings::default()
    });
    // Re-armed at 10ms: fade at 2010ms, next slide at 2810ms.
    let f = h.at(1_900).await;
    assert!(f.visible);
    let f = h.at(2_100).await;
    assert_eq!((f.index, f.visible), (0, false));
    let f = h.at(2_900).await;
    assert_eq!((f.index, f.visible), (1, true));

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn interval_not_longer_than_fade_falls_back_to_default() {
    let h = Harness::spawn(session_config(), Arc::new(Luach), PLAIN_DAY, vec![item(1), item(2)]);
    h.settings_tx.send_replace(BoardSettings {
        slide_duration: Some(500),
        ..BoardSettings::default()
    });
    let f = h.at(4_000).await;
    assert_eq!((f.index, f.visible), (0, true));
    let f = h.at(5_900).await;
    assert_eq!((f.index, f.visible), (1, true));
    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn rolls_over_at_local_midnight() {
    // 23:59:30 in Jerusalem (UTC+2 in November).
    let h = Harness::spawn(
        session_config(),
        Arc::new(Luach),
        "2023-11-01T21:59:30Z",
        vec![dated(1, "2023-11-01"), dated(2, "2023-11-02")],
    );

    let f = h.at(30_000).await;
    assert_eq!(f.slide.id(), "1");
    assert_eq!(f.hebrew_date, "י\"ז בחשון תשפ\"ד");

    // The refresh at 60s sees 00:00:30 on the next day.
    let f = h.at(61_000).await;
    assert_eq!((f.total, f.slide.id()), (1, "2".to_string()));
    assert_eq!(f.hebrew_date, "י\"ח בחשון תשפ\"ד");

    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn holiday_slide_leads_the_rotation() {
    // 25 Kislev 5784, first day of Chanukah.
    let h = Harness::spawn(
        session_config(),
        Arc::new(Luach),
        "2023-12-08T10:00:00Z",
        vec![item(1)],
    );
    let f = h.at(10).await;
    assert_eq!(f.total, 2);
    assert_eq!(f.slide.id(), "holiday");
    assert!(f.slide.main_name().contains("חנוכה"));
    assert_eq!(f.slide.sub_text(), "חג שמח!");
    assert_eq!(f.holiday.as_deref(), Some(f.slide.main_name()));
    h.shutdown().await;
}

struct Failing;

impl HebrewCalendarAdapter for Failing {
    fn from_civil(&self, date: NaiveDate) -> Result<HebrewDate, BoardError> {
        Err(BoardError::OutOfRangeDate(date.to_string()))
    }

    fn to_civil(&self, date: &HebrewDate) -> Result<NaiveDate, BoardError> {
        Err(BoardError::OutOfRangeDate(date.to_string()))
    }

    fn events_on(&self, date: NaiveDate, _: Locale) -> Result<Vec<CalendarEvent>, BoardError> {
        Err(BoardError::OutOfRangeDate(date.to_string()))
    }
}

#[tokio::test(start_paused = true)]
async fn calendar_failure_degrades_to_civil_matching() {
    let mut hebrew_only = item(3);
    hebrew_only.hebrew_date = Some("י\"ז בחשון תשפ\"ג".into());
    let h = Harness::spawn(
        session_config(),
        Arc::new(Failing),
        PLAIN_DAY,
        vec![dated(1, "2023-11-01"), dated(2, "2023-11-02"), hebrew_only],
    );
    let f = h.at(10).await;
    assert_eq!(f.hebrew_date, "");
    assert_eq!(f.holiday, None);
    assert_eq!((f.total, f.slide.id()), (1, "1".to_string()));
    h.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn cancellation_ends_the_session() {
    let h = Harness::spawn(session_config(), Arc::new(Luach), PLAIN_DAY, vec![item(1), item(2)]);
    h.at(10).await;
    h.cancel.cancel();
    tokio::time::timeout(Duration::from_secs(1), h.handle)
        .await
        .expect("session stopped")
        .unwrap()
        .unwrap();
}
