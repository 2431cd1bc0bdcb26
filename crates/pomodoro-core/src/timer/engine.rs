//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use
//! internal threads or read the clock - the caller is responsible for
//! calling `tick()` once per elapsed second.
//!
//! ## State Transitions
//!
//! ```text
//! (Idle, Work) -start-> (Running, Work) -expiry-> (Running|Idle, Break)
//! (Running, Break) -expiry-> (Running|Idle, Work) + session completed
//! ```
//!
//! `reset()` and `switch_phase()` return to `Idle` from any state.
//!
//! ## Usage
//!
//! ```
//! use pomodoro_core::TimerEngine;
//!
//! let mut engine = TimerEngine::new();
//! engine.configure(1, 1).unwrap();
//! engine.start();
//! for _ in 0..60 {
//!     engine.tick();
//! }
//! assert!(!engine.is_running());
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use super::clock::format_clock;
use super::phase::{Phase, TimerConfiguration};
use crate::error::TimerError;
use crate::events::Event;

/// Whether ticks currently count down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

/// Point-in-time view of the engine for presentation layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: TimerState,
    pub phase: Phase,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub clock: String,
    pub progress: f64,
    pub sessions_completed: u32,
    pub auto_start: bool,
    pub at: chrono::DateTime<Utc>,
}

/// Core timer engine.
///
/// Owns the configuration and the countdown state. All mutation goes
/// through the commands below; each returns the events it produced.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    config: TimerConfiguration,
    phase: Phase,
    remaining_secs: u64,
    running: bool,
    sessions_completed: u32,
    auto_start: bool,
}

impl TimerEngine {
    /// Create an engine with the default 25/5 minute configuration.
    pub fn new() -> Self {
        Self::with_configuration(TimerConfiguration::default())
    }

    /// Create an engine idle at the start of a work phase.
    pub fn with_configuration(config: TimerConfiguration) -> Self {
        Self {
            config,
            phase: Phase::Work,
            remaining_secs: config.work_secs,
            running: false,
            sessions_completed: 0,
            auto_start: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.running {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    pub fn auto_start(&self) -> bool {
        self.auto_start
    }

    pub fn configuration(&self) -> TimerConfiguration {
        self.config
    }

    /// Full duration of the current phase.
    pub fn total_secs(&self) -> u64 {
        self.config.duration_secs(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress_fraction(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        total.saturating_sub(self.remaining_secs) as f64 / total as f64
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state(),
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            clock: format_clock(self.remaining_secs),
            progress: self.progress_fraction(),
            sessions_completed: self.sessions_completed,
            auto_start: self.auto_start,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace both durations and return to the start of a work phase.
    ///
    /// On error nothing changes. The session count is kept.
    pub fn configure(&mut self, work_min: i64, break_min: i64) -> Result<Event, TimerError> {
        let config = TimerConfiguration::from_minutes(work_min, break_min).inspect_err(|e| {
            warn!(work_min, break_min, "rejected timer configuration: {e}");
        })?;
        Ok(self.apply_configuration(config))
    }

    /// Like [`configure`](Self::configure), from raw user input.
    pub fn configure_from_input(&mut self, work: &str, break_: &str) -> Result<Event, TimerError> {
        let config = TimerConfiguration::parse(work, break_).inspect_err(|e| {
            warn!(work, break_, "rejected timer configuration: {e}");
        })?;
        Ok(self.apply_configuration(config))
    }

    fn apply_configuration(&mut self, config: TimerConfiguration) -> Event {
        self.config = config;
        self.phase = Phase::Work;
        self.remaining_secs = config.work_secs;
        self.running = false;
        info!(
            work_secs = config.work_secs,
            break_secs = config.break_secs,
            "timer configured"
        );
        Event::ConfigurationChanged {
            work_secs: config.work_secs,
            break_secs: config.break_secs,
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        debug!(phase = %self.phase, remaining = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        })
    }

    /// Stop counting. Returns an event only when the timer was running.
    pub fn pause(&mut self) -> Option<Event> {
        let was_running = std::mem::replace(&mut self.running, false);
        if !was_running {
            return None;
        }
        debug!(phase = %self.phase, remaining = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        })
    }

    /// Stop and rewind the current phase to its full duration.
    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.remaining_secs = self.total_secs();
        debug!(phase = %self.phase, "timer reset");
        Event::TimerReset {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        }
    }

    /// Manually jump to `target`. Never counts as a completed session.
    pub fn switch_phase(&mut self, target: Phase) -> Event {
        self.running = false;
        self.phase = target;
        self.remaining_secs = self.config.duration_secs(target);
        debug!(phase = %target, "phase switched manually");
        Event::PhaseChanged {
            phase: target,
            manual: true,
        }
    }

    pub fn set_auto_start(&mut self, enabled: bool) {
        self.auto_start = enabled;
        debug!(enabled, "auto-start updated");
    }

    /// Advance the countdown by one second.
    ///
    /// Does nothing while idle. When the countdown reaches zero the phase
    /// flips in the same call.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.running {
            return events;
        }

        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            trace!(remaining = self.remaining_secs, phase = %self.phase, "tick");
            events.push(Event::ProgressUpdated {
                remaining_secs: self.remaining_secs,
                phase: self.phase,
            });
        }

        if self.remaining_secs == 0 {
            self.expire(&mut events);
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn expire(&mut self, events: &mut Vec<Event>) {
        let next = self.phase.next();
        self.phase = next;
        self.remaining_secs = self.config.duration_secs(next);

        if next == Phase::Work {
            self.sessions_completed = self.sessions_completed.saturating_add(1);
            info!(sessions = self.sessions_completed, "session completed");
            events.push(Event::SessionCompleted {
                sessions_completed: self.sessions_completed,
            });
        }
        info!(phase = %next, "phase expired");
        events.push(Event::PhaseChanged {
            phase: next,
            manual: false,
        });

        if self.remaining_secs == 0 {
            self.running = false;
            warn!(phase = %next, "phase has zero duration, stopping");
            events.push(Event::SessionTooShort { phase: next });
            return;
        }

        if !self.auto_start {
            self.running = false;
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}
