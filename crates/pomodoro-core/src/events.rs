use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change in the engine produces an Event.
/// Commands return the events they emitted; front ends render them and
/// forward them to notifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// One second elapsed in the current phase.
    ProgressUpdated {
        remaining_secs: u64,
        phase: Phase,
    },
    /// The current phase changed, either on expiry or by a manual switch.
    PhaseChanged {
        phase: Phase,
        manual: bool,
    },
    /// A full work+break cycle finished.
    SessionCompleted {
        sessions_completed: u32,
    },
    /// The phase just entered has a zero duration; the engine stopped.
    SessionTooShort {
        phase: Phase,
    },
    ConfigurationChanged {
        work_secs: u64,
        break_secs: u64,
    },
    InvalidDuration {
        phase: Phase,
        value: String,
    },
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
    },
    TimerReset {
        phase: Phase,
        remaining_secs: u64,
    },
}

impl Event {
    /// Whether an audio notifier should fire for this event.
    pub fn is_audible(&self) -> bool {
        matches!(
            self,
            Event::PhaseChanged { manual: false, .. } | Event::SessionCompleted { .. }
        )
    }
}

/// Collaborator that reacts to engine events (sound, desktop notification).
///
/// The engine never calls notifiers itself; the driver forwards events.
pub trait Notifier {
    fn notify(&mut self, event: &Event);
}

/// Forward every event to the notifier.
pub fn dispatch<N: Notifier + ?Sized>(notifier: &mut N, events: &[Event]) {
    for event in events {
        notifier.notify(event);
    }
}
