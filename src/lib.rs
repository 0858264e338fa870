//! Hebrew-calendar date engine and daily slide scheduler for a dedication board.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod gematria;
pub mod hebrew_date;
pub mod holiday;
pub mod rotation;
pub mod selector;
pub mod tasks {
    pub mod board;
    pub mod display;
}
