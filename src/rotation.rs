use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPhase {
    /// Torn down; no timer armed.
    Idle,
    Showing,
    /// Fading out before the next slide.
    Transitioning,
}

/// Counter and fade flag exposed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleState {
    /// Slides advanced since the session started. Never wraps; the displayed index is
    /// `counter % slide_count`.
    pub counter: u64,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationEvent {
    FadeOut,
    Advanced { index: usize },
}

/// Cyclic slide rotation driven by explicit instants.
///
/// Rules:
/// - With fewer than two slides nothing is armed and the first slide stays visible.
/// - Each interval tick hides the slide for `fade`, then advances the counter by one.
/// - A late tick advances once; missed periods are dropped.
/// - Reconfiguring re-arms from scratch and keeps the counter.
#[derive(Debug, Clone)]
pub struct RotationScheduler {
    state: ScheduleState,
    phase: RotationPhase,
    slide_count: usize,
    interval: Duration,
    fade: Duration,
    next_tick: Option<Instant>,
    fade_until: Option<Instant>,
}

impl RotationScheduler {
    pub fn new(slide_count: usize, interval: Duration, fade: Duration, now: Instant) -> Self {
        let mut scheduler = Self {
            state: ScheduleState {
                counter: 0,
                visible: true,
            },
            phase: RotationPhase::Showing,
            slide_count,
            interval,
            fade,
            next_tick: None,
            fade_until: None,
        };
        scheduler.arm(now);
        scheduler
    }

    fn arm(&mut self, now: Instant) {
        self.fade_until = None;
        self.next_tick = (self.slide_count > 1 && !self.interval.is_zero())
            .then(|| now + self.interval);
    }

    pub fn phase(&self) -> RotationPhase {
        self.phase
    }

    pub fn state(&self) -> ScheduleState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn current_index(&self) -> usize {
        if self.slide_count == 0 {
            return 0;
        }
        (self.state.counter % self.slide_count as u64) as usize
    }

    /// When the host should call [`Self::on_tick`] next.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            RotationPhase::Idle => None,
            RotationPhase::Showing => self.next_tick,
            RotationPhase::Transitioning => self.fade_until,
        }
    }

    pub fn on_tick(&mut self, now: Instant) -> Option<RotationEvent> {
        match self.phase {
            RotationPhase::Idle => None,
            RotationPhase::Showing => {
                let due = self.next_tick?;
                if now < due {
                    return None;
                }
                let mut next = due + self.interval;
                while next <= now {
                    next += self.interval;
                }
                self.next_tick = Some(next);
                self.fade_until = Some(now + self.fade);
                self.state.visible = false;
                self.phase = RotationPhase::Transitioning;
                Some(RotationEvent::FadeOut)
            }
            RotationPhase::Transitioning => {
                let until = self.fade_until?;
                if now < until {
                    return None;
                }
                self.fade_until = None;
                self.state.counter += 1;
                self.state.visible = true;
                self.phase = RotationPhase::Showing;
                Some(RotationEvent::Advanced {
                    index: self.current_index(),
                })
            }
        }
    }

    /// Tear down the timer and re-arm for a new slide count or interval. An in-flight
    /// fade is abandoned without advancing.
    pub fn reconfigure(&mut self, slide_count: usize, interval: Duration, now: Instant) {
        self.slide_count = slide_count;
        self.interval = interval;
        self.state.visible = true;
        self.phase = RotationPhase::Showing;
        self.arm(now);
    }

    pub fn teardown(&mut self) {
        self.next_tick = None;
        self.fade_until = None;
        self.state.visible = true;
        self.phase = RotationPhase::Idle;
    }
}
