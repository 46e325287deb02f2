//! Rest-period countdown.
//!
//! [`RestTimer`] is a four-phase state machine (idle, running, paused, and a
//! short completed grace phase). Remaining time is always recomputed from the
//! elapsed wall clock since a recorded reference instant, never by per-tick
//! decrement, so late or missed ticks self-correct instead of drifting.
//!
//! Every time-sensitive operation has an `_at(now)` variant so tests inject
//! instants instead of sleeping.

use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Hm51Error, Result};
use crate::events::{EventSink, WorkoutEvent};

/// How long the completed phase lingers before the timer returns to idle.
pub const COMPLETION_GRACE: Duration = Duration::from_secs(3);

/// Reported countdown state. `formatted` renders `m:ss` with zero-padded
/// seconds; `remaining` rounds up, so a fresh countdown reads its full value
/// and `0` only once the duration has fully elapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining: u32,
    pub duration: u32,
    pub running: bool,
    pub formatted: String,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Running { target: Duration, reference: Instant },
    Paused { target: Duration, remaining: Duration },
    Completed { target: Duration, since: Instant },
}

/// Countdown clock for rest periods between sets.
///
/// Emits [`WorkoutEvent::TimerCompleted`] exactly once per started countdown;
/// `reset` or a restart discards the superseded countdown so it can never
/// fire a stale completion.
pub struct RestTimer {
    phase: Phase,
    sink: Rc<dyn EventSink>,
}

impl RestTimer {
    pub fn new(sink: Rc<dyn EventSink>) -> Self {
        RestTimer {
            phase: Phase::Idle,
            sink,
        }
    }

    /// Starts a countdown of `secs` seconds. Starting while already running
    /// restarts cleanly. Zero duration is rejected without mutating state.
    pub fn start(&mut self, secs: u32) -> Result<TimerState> {
        self.start_at(secs, Instant::now())
    }

    pub fn start_at(&mut self, secs: u32, now: Instant) -> Result<TimerState> {
        if secs == 0 {
            return Err(Hm51Error::InvalidDuration(secs));
        }
        self.phase = Phase::Running {
            target: Duration::from_secs(u64::from(secs)),
            reference: now,
        };
        debug!(secs, "Rest timer started");
        Ok(self.state_at(now))
    }

    /// Advances the state machine against the wall clock. Drives completion
    /// (fires the event) and the grace-phase return to idle. No-op when idle
    /// or paused.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        match self.phase {
            Phase::Running { target, reference } => {
                if now.saturating_duration_since(reference) >= target {
                    let duration_secs = target.as_secs() as u32;
                    self.phase = Phase::Completed { target, since: now };
                    debug!(duration_secs, "Rest timer completed");
                    self.sink
                        .notify(WorkoutEvent::TimerCompleted { duration_secs });
                }
            }
            Phase::Completed { since, .. } => {
                if now.saturating_duration_since(since) >= COMPLETION_GRACE {
                    self.phase = Phase::Idle;
                    debug!("Rest timer back to idle");
                }
            }
            _ => {}
        }
    }

    /// Freezes the remaining time. No-op unless running.
    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn pause_at(&mut self, now: Instant) {
        if let Phase::Running { target, reference } = self.phase {
            let remaining = target.saturating_sub(now.saturating_duration_since(reference));
            self.phase = Phase::Paused { target, remaining };
            debug!("Rest timer paused");
        }
    }

    /// Continues counting down from the frozen remaining value (not from the
    /// full duration). No-op unless paused.
    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    pub fn resume_at(&mut self, now: Instant) {
        if let Phase::Paused { target, remaining } = self.phase {
            // Re-anchor the reference so elapsed-since-reference equals the
            // time already spent before the pause.
            let reference = now.checked_sub(target - remaining).unwrap_or(now);
            self.phase = Phase::Running { target, reference };
            debug!("Rest timer resumed");
        }
    }

    /// Running pauses, paused resumes. Idle has no retained target, so there
    /// is nothing to toggle.
    pub fn toggle(&mut self) {
        self.toggle_at(Instant::now());
    }

    pub fn toggle_at(&mut self, now: Instant) {
        match self.phase {
            Phase::Running { .. } => self.pause_at(now),
            Phase::Paused { .. } => self.resume_at(now),
            _ => {}
        }
    }

    /// Discards the countdown and returns to idle. A reset countdown can
    /// never emit a completion afterwards.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        debug!("Rest timer reset");
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn state(&self) -> TimerState {
        self.state_at(Instant::now())
    }

    pub fn state_at(&self, now: Instant) -> TimerState {
        let (remaining, duration, running) = match self.phase {
            Phase::Idle => (0, 0, false),
            Phase::Running { target, reference } => {
                let left = target.saturating_sub(now.saturating_duration_since(reference));
                (ceil_secs(left), target.as_secs() as u32, true)
            }
            Phase::Paused { target, remaining } => {
                (ceil_secs(remaining), target.as_secs() as u32, false)
            }
            Phase::Completed { target, .. } => (0, target.as_secs() as u32, false),
        };
        TimerState {
            remaining,
            duration,
            running,
            formatted: format_clock(remaining),
        }
    }
}

fn ceil_secs(duration: Duration) -> u32 {
    let secs = duration.as_secs() as u32;
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// Renders whole seconds as `m:ss`.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
