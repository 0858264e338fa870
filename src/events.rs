use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a stored item: the document store hands out strings, the local
/// mock store numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A dedication record as written by the admin surface. Read-only here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DedicationItem {
    pub id: Option<ItemId>,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: Option<String>,
    pub main_name: Option<String>,
    pub sub_text: Option<String>,
    pub notes: Option<String>,
    pub footer_text: Option<String>,
    pub donor_name: Option<String>,
    pub donor_logo: Option<String>,
    /// Civil date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Formatted Hebrew date, `"<day> ב<month> <year>"`.
    pub hebrew_date: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub expiration_timestamp: Option<DateTime<Utc>>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl DedicationItem {
    /// The civil date, ignoring the empty string the admin form stores for "none".
    pub fn civil_date(&self) -> Option<&str> {
        non_blank(&self.date)
    }

    pub fn hebrew_date_text(&self) -> Option<&str> {
        non_blank(&self.hebrew_date)
    }

    pub fn is_undated(&self) -> bool {
        self.civil_date().is_none() && self.hebrew_date_text().is_none()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_timestamp.is_some_and(|at| at < now)
    }
}

/// Synthetic slide announcing today's holiday. Built per scheduling cycle, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidaySlide {
    pub main_name: String,
    pub sub_text: String,
}

impl HolidaySlide {
    pub const ID: &'static str = "holiday";
    pub const KIND: &'static str = "holiday";
}

/// Fallback slide shown when nothing is scheduled for today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultSlide {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub main_name: String,
    pub sub_text: String,
    pub footer_text: String,
}

impl DefaultSlide {
    pub const ID: &'static str = "empty";
}

impl Default for DefaultSlide {
    fn default() -> Self {
        Self {
            kind: "memorial".to_string(),
            title: "הכתובת שלך במרכז הרפואי".to_string(),
            main_name: "לב חב\"ד".to_string(),
            sub_text: "כאן בשבילכם תמיד".to_string(),
            footer_text: "ברוכים הבאים ללב חב\"ד".to_string(),
        }
    }
}

/// Board-wide settings published by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardSettings {
    /// Per-slide dwell in milliseconds.
    #[serde(alias = "slideDurationMs")]
    pub slide_duration: Option<u64>,
    pub default_slide: Option<DefaultSlide>,
}

impl BoardSettings {
    pub fn slide_duration(&self) -> Option<Duration> {
        self.slide_duration
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Slide {
    Item(DedicationItem),
    Holiday(HolidaySlide),
    Default(DefaultSlide),
}

impl Slide {
    pub fn id(&self) -> String {
        match self {
            Self::Item(item) => item
                .id
                .as_ref()
                .map_or_else(String::new, ToString::to_string),
            Self::Holiday(_) => HolidaySlide::ID.to_string(),
            Self::Default(_) => DefaultSlide::ID.to_string(),
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::Item(item) => &item.kind,
            Self::Holiday(_) => HolidaySlide::KIND,
            Self::Default(slide) => &slide.kind,
        }
    }

    pub fn main_name(&self) -> &str {
        match self {
            Self::Item(item) => item.main_name.as_deref().unwrap_or_default(),
            Self::Holiday(slide) => &slide.main_name,
            Self::Default(slide) => &slide.main_name,
        }
    }

    pub fn sub_text(&self) -> &str {
        match self {
            Self::Item(item) => item.sub_text.as_deref().unwrap_or_default(),
            Self::Holiday(slide) => &slide.sub_text,
            Self::Default(slide) => &slide.sub_text,
        }
    }
}

/// Everything the renderer needs for the current instant.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    pub slide: Slide,
    /// Fade flag: false while the outgoing slide fades out.
    pub visible: bool,
    /// Today's Hebrew date, blank when the calendar cannot compute it.
    pub hebrew_date: String,
    pub holiday: Option<String>,
    pub index: usize,
    pub total: usize,
}
