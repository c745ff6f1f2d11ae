use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::validator::{TimeError, MAX_ALLOWED_SECONDS, MIN_ALLOWED_SECONDS};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    Tick(u32),
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Idle,
    Running { remaining: u32, next_tick: Instant },
}

/// Fixed period countdown, polled by the event loop.
///
/// Each deadline is the previous deadline plus one period, so a late poll
/// delivers every missed tick exactly once and in order.
#[derive(Debug, Clone)]
pub struct GameClock {
    state: ClockState,
    period: Duration,
}

impl GameClock {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            state: ClockState::Idle,
            period,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            ClockState::Running { remaining, .. } => Some(remaining),
            ClockState::Idle => None,
        }
    }

    pub fn start(&mut self, duration_secs: u32, now: Instant) -> Result<(), TimeError> {
        if !(MIN_ALLOWED_SECONDS..=MAX_ALLOWED_SECONDS).contains(&duration_secs) {
            error!(duration_secs, "refusing to start clock outside allowed range");
            return Err(TimeError::InvalidDuration(duration_secs));
        }

        self.state = ClockState::Running {
            remaining: duration_secs,
            next_tick: now + self.period,
        };
        debug!(duration_secs, "clock started");
        Ok(())
    }

    /// Stops the countdown. Calling it on an idle clock does nothing.
    pub fn stop(&mut self) {
        if self.is_running() {
            debug!("clock stopped");
        }
        self.state = ClockState::Idle;
    }

    pub fn poll(&mut self, now: Instant) -> Vec<ClockEvent> {
        let mut events = Vec::new();

        while let ClockState::Running {
            remaining,
            next_tick,
        } = self.state
        {
            if now < next_tick {
                break;
            }

            let remaining = remaining.saturating_sub(1);
            events.push(ClockEvent::Tick(remaining));

            if remaining == 0 {
                events.push(ClockEvent::Expired);
                self.state = ClockState::Idle;
            } else {
                self.state = ClockState::Running {
                    remaining,
                    next_tick: next_tick + self.period,
                };
            }
        }

        events
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}
