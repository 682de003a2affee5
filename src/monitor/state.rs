//! Per-monitor tick state
//!
//! `MonitorState` is owned by exactly one monitor loop and advanced once per
//! tick. It never performs I/O; the loop renders and delivers whatever
//! [`TickOutcome`] it returns.

use crate::config::{IdleClock, NotificationConfig};

/// What the change source reported for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First successful sample of a polled source; carries no delta
    Baseline,
    /// Change magnitude observed since the previous tick
    Delta(u64),
}

/// Decision taken for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Baseline tick: nothing evaluated
    Skipped,
    /// Changes happened; notify with this magnitude
    Changed { magnitude: u64 },
    /// No changes; notify with the elapsed idle time
    Idle { idle_minutes: f64 },
    /// No changes and the idle ceiling has been passed
    Suppressed { idle_minutes: f64 },
}

/// Monitor phase, derived from the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Idle,
    IdleSuppressed,
}

#[derive(Debug, Clone)]
pub struct MonitorState {
    interval_secs: u64,
    max_idle_secs: u64,
    idle_clock: IdleClock,
    accumulated: u64,
    idle_elapsed_secs: u64,
    idle_suppressed: bool,
    phase: Phase,
}

impl MonitorState {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            interval_secs: config.notification_interval,
            max_idle_secs: config.max_idle_time,
            idle_clock: config.idle_clock,
            accumulated: 0,
            idle_elapsed_secs: 0,
            idle_suppressed: false,
            phase: Phase::Idle,
        }
    }

    /// Apply one tick's observation
    pub fn advance(&mut self, observation: Observation) -> TickOutcome {
        let delta = match observation {
            Observation::Baseline => return TickOutcome::Skipped,
            Observation::Delta(delta) => delta,
        };

        if delta > 0 {
            self.accumulated += delta;
            self.idle_elapsed_secs = 0;
            self.idle_suppressed = false;
            self.phase = Phase::Active;

            let magnitude = self.accumulated;
            self.accumulated = 0;
            return TickOutcome::Changed { magnitude };
        }

        if !(self.idle_suppressed && self.idle_clock == IdleClock::Frozen) {
            self.idle_elapsed_secs += self.interval_secs;
        }

        // Reaching the ceiling exactly still notifies; passing it suppresses.
        if self.max_idle_secs > 0 && self.idle_elapsed_secs > self.max_idle_secs {
            self.idle_suppressed = true;
        }

        let idle_minutes = self.idle_minutes();
        if self.idle_suppressed {
            self.phase = Phase::IdleSuppressed;
            TickOutcome::Suppressed { idle_minutes }
        } else {
            self.phase = Phase::Idle;
            TickOutcome::Idle { idle_minutes }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn accumulated(&self) -> u64 {
        self.accumulated
    }

    pub fn idle_elapsed_secs(&self) -> u64 {
        self.idle_elapsed_secs
    }

    pub fn idle_minutes(&self) -> f64 {
        self.idle_elapsed_secs as f64 / 60.0
    }

    pub fn is_idle_suppressed(&self) -> bool {
        self.idle_suppressed
    }
}
