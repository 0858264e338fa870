use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono_tz::Tz;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::calendar::{HebrewCalendarAdapter, HebrewDate, Locale};
use crate::clock::Clock;
use crate::config::Configuration;
use crate::events::{BoardSettings, DedicationItem, DisplayFrame, Slide};
use crate::hebrew_date;
use crate::holiday::HolidayDetector;
use crate::rotation::RotationScheduler;
use crate::selector::TodaySlideSelector;

/// The parts of [`Configuration`] a display session runs on.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub timezone: Tz,
    pub locale: Locale,
    pub fade: Duration,
    pub default_interval: Duration,
    pub date_refresh: Duration,
    pub holiday_greeting: String,
}

impl From<&Configuration> for SessionConfig {
    fn from(cfg: &Configuration) -> Self {
        Self {
            timezone: cfg.timezone,
            locale: cfg.calendar_locale,
            fade: cfg.fade(),
            default_interval: cfg.default_slide_duration(),
            date_refresh: cfg.date_refresh,
            holiday_greeting: cfg.holiday_greeting.clone(),
        }
    }
}

struct Session {
    cfg: SessionConfig,
    calendar: Arc<dyn HebrewCalendarAdapter>,
    clock: Arc<dyn Clock>,
    selector: TodaySlideSelector,
    items: Vec<DedicationItem>,
    settings: BoardSettings,
    today: Option<HebrewDate>,
    hebrew_label: String,
    holiday: Option<String>,
    slides: Vec<Slide>,
    rotation: RotationScheduler,
}

impl Session {
    fn new(
        cfg: SessionConfig,
        calendar: Arc<dyn HebrewCalendarAdapter>,
        clock: Arc<dyn Clock>,
        items: Vec<DedicationItem>,
        settings: BoardSettings,
    ) -> Self {
        let selector = TodaySlideSelector::new(
            HolidayDetector::new(calendar.clone(), cfg.locale),
            cfg.holiday_greeting.clone(),
        );
        let rotation =
            RotationScheduler::new(0, cfg.default_interval, cfg.fade, Instant::now().into_std());
        let mut session = Self {
            cfg,
            calendar,
            clock,
            selector,
            items,
            settings,
            today: None,
            hebrew_label: String::new(),
            holiday: None,
            slides: Vec::new(),
            rotation,
        };
        session.refresh_date();
        session
    }

    fn interval(&self) -> Duration {
        match self.settings.slide_duration() {
            Some(interval) if interval > self.cfg.fade => interval,
            Some(interval) => {
                warn!(
                    interval_ms = interval.as_millis() as u64,
                    fade_ms = self.cfg.fade.as_millis() as u64,
                    "slide duration not longer than the fade; using default"
                );
                self.cfg.default_interval
            }
            None => self.cfg.default_interval,
        }
    }

    /// Recompute today's date and holiday, then the slide set.
    fn refresh_date(&mut self) {
        let civil = self.clock.now().with_timezone(&self.cfg.timezone).date_naive();
        match self.calendar.from_civil(civil) {
            Ok(date) => {
                let label = hebrew_date::format(&date);
                if label != self.hebrew_label {
                    info!(%civil, hebrew = %label, "date changed");
                }
                self.hebrew_label = label;
                self.today = Some(date);
            }
            Err(err) => {
                warn!(%civil, error = %err, "hebrew date unavailable; matching civil dates only");
                self.hebrew_label.clear();
                self.today = None;
            }
        }
        self.holiday = self.selector.holiday(civil);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let now = self.clock.now().with_timezone(&self.cfg.timezone);
        let mut slides =
            self.selector
                .assemble(&self.items, now, self.today.as_ref(), self.holiday.clone());
        if slides.is_empty() {
            slides.push(Slide::Default(
                self.settings.default_slide.clone().unwrap_or_default(),
            ));
        }
        self.slides = slides;

        let interval = self.interval();
        if self.slides.len() != self.rotation.slide_count() || interval != self.rotation.interval()
        {
            debug!(
                slides = self.slides.len(),
                interval_ms = interval.as_millis() as u64,
                "rotation re-armed"
            );
            self.rotation
                .reconfigure(self.slides.len(), interval, Instant::now().into_std());
        }
    }

    fn frame(&self) -> Option<DisplayFrame> {
        let index = self.rotation.current_index();
        let slide = self.slides.get(index)?.clone();
        Some(DisplayFrame {
            slide,
            visible: self.rotation.is_visible(),
            hebrew_date: self.hebrew_label.clone(),
            holiday: self.holiday.clone(),
            index,
            total: self.slides.len(),
        })
    }

    fn publish(&self, frames: &watch::Sender<Option<DisplayFrame>>) {
        let Some(frame) = self.frame() else {
            return;
        };
        frames.send_if_modified(|current| {
            if current.as_ref() == Some(&frame) {
                return false;
            }
            *current = Some(frame);
            true
        });
    }
}

async fn sleep_until_deadline(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

/// Drive slide rotation and the daily date rollover until cancelled.
///
/// Items and settings are read from their watch channels on every change; frames are
/// published whenever the visible slide, fade flag or date label changes.
#[instrument(skip_all)]
pub async fn run(
    cfg: SessionConfig,
    calendar: Arc<dyn HebrewCalendarAdapter>,
    clock: Arc<dyn Clock>,
    mut items_rx: watch::Receiver<Vec<DedicationItem>>,
    mut settings_rx: watch::Receiver<BoardSettings>,
    frames: watch::Sender<Option<DisplayFrame>>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut refresh = time::interval(cfg.date_refresh);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; the session already starts fresh.
    refresh.tick().await;

    let items = items_rx.borrow_and_update().clone();
    let settings = settings_rx.borrow_and_update().clone();
    let mut session = Session::new(cfg, calendar, clock, items, settings);
    session.publish(&frames);
    info!(slides = session.slides.len(), "display session started");

    let mut items_open = true;
    let mut settings_open = true;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                session.rotation.teardown();
                info!("cancel received; exiting display session");
                break;
            }
            changed = items_rx.changed(), if items_open => match changed {
                Ok(()) => {
                    session.items = items_rx.borrow_and_update().clone();
                    session.rebuild();
                }
                Err(_) => {
                    debug!("item source closed; keeping last items");
                    items_open = false;
                }
            },
            changed = settings_rx.changed(), if settings_open => match changed {
                Ok(()) => {
                    session.settings = settings_rx.borrow_and_update().clone();
                    session.rebuild();
                }
                Err(_) => {
                    debug!("settings source closed; keeping last settings");
                    settings_open = false;
                }
            },
            _ = sleep_until_deadline(session.rotation.next_deadline()) => {
                if let Some(event) = session.rotation.on_tick(Instant::now().into_std()) {
                    debug!(?event, "rotation");
                }
            }
            _ = refresh.tick() => session.refresh_date(),
        }
        session.publish(&frames);
    }
    Ok(())
}
