use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, ensure};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::calendar::Locale;
use crate::selector::DEFAULT_HOLIDAY_GREETING;

/// Years the picker can express with a single gematria block.
const PICKER_YEAR_LIMITS: RangeInclusive<i32> = 5001..=5999;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// JSON board document holding the items and settings.
    pub board_path: PathBuf,
    /// Zone that decides which calendar day "today" is.
    pub timezone: Tz,
    /// Holiday schedule to follow (Israel or diaspora).
    pub calendar_locale: Locale,
    /// Fade-out duration before each slide change, in milliseconds.
    pub fade_ms: u64,
    /// Slide interval when the board settings do not provide one, in milliseconds.
    pub default_slide_duration_ms: u64,
    /// How often the session re-evaluates today's date and slide set.
    #[serde(with = "humantime_serde")]
    pub date_refresh: Duration,
    pub picker_years: PickerYears,
    /// Second line of the holiday slide.
    pub holiday_greeting: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PickerYears {
    pub start: i32,
    pub end: i32,
}

impl Default for PickerYears {
    fn default() -> Self {
        Self {
            start: 5680,
            end: 5800,
        }
    }
}

impl PickerYears {
    pub fn range(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.start <= self.end,
            "picker-years.start must not be after picker-years.end"
        );
        ensure!(
            PICKER_YEAR_LIMITS.contains(&self.start) && PICKER_YEAR_LIMITS.contains(&self.end),
            "picker-years must lie within {}..={}",
            PICKER_YEAR_LIMITS.start(),
            PICKER_YEAR_LIMITS.end()
        );
        Ok(())
    }
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(self.fade_ms > 0, "fade-ms must be greater than zero");
        ensure!(
            self.default_slide_duration_ms > self.fade_ms,
            "default-slide-duration-ms must be longer than fade-ms"
        );
        ensure!(
            !self.date_refresh.is_zero(),
            "date-refresh must be greater than zero"
        );
        self.picker_years.validate()?;
        Ok(self)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn default_slide_duration(&self) -> Duration {
        Duration::from_millis(self.default_slide_duration_ms)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            board_path: PathBuf::from("board.json"),
            timezone: chrono_tz::Asia::Jerusalem,
            calendar_locale: Locale::Israel,
            fade_ms: 800,
            default_slide_duration_ms: 5000,
            date_refresh: Duration::from_secs(60),
            picker_years: PickerYears::default(),
            holiday_greeting: DEFAULT_HOLIDAY_GREETING.to_string(),
        }
    }
}
