use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

/// Wall-clock source for the display session.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Starts at a fixed instant and advances with the tokio clock, so a pinned `--now`
/// still crosses midnight and paused-time tests can drive the calendar day.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    origin: DateTime<Utc>,
    started: Instant,
}

impl OffsetClock {
    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            started: Instant::now(),
        }
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.started.elapsed()).unwrap_or(TimeDelta::MAX);
        self.origin
            .checked_add_signed(elapsed)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn offset_clock_follows_tokio_time() {
        let origin = DateTime::parse_from_rfc3339("2023-11-01T21:59:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let clock = OffsetClock::starting_at(origin);
        assert_eq!(clock.now(), origin);
        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(clock.now(), origin + TimeDelta::minutes(2));
    }
}
