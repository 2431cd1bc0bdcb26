mod clock;
mod engine;
mod phase;

pub use clock::{format_clock, progress_bar};
pub use engine::{Snapshot, TimerEngine, TimerState};
pub use phase::{parse_minutes, Phase, TimerConfiguration, DEFAULT_BREAK_MIN, DEFAULT_WORK_MIN};
