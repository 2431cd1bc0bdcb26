use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

pub const DEFAULT_WORK_MIN: u64 = 25;
pub const DEFAULT_BREAK_MIN: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one when it expires.
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::Break => "Break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Work => f.write_str("work"),
            Phase::Break => f.write_str("break"),
        }
    }
}

/// Work and break durations, in seconds.
///
/// Values built through [`TimerConfiguration::from_minutes`] are always
/// positive. The fields stay public so a driver can assemble sub-minute
/// durations directly; the engine guards against zero at phase expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfiguration {
    pub work_secs: u64,
    pub break_secs: u64,
}

impl TimerConfiguration {
    /// Validate both durations and convert them to seconds.
    ///
    /// Either value being zero, negative, or too large to express in
    /// seconds fails with [`TimerError::InvalidDuration`].
    pub fn from_minutes(work_min: i64, break_min: i64) -> Result<Self, TimerError> {
        Ok(Self {
            work_secs: minutes_to_secs(Phase::Work, work_min)?,
            break_secs: minutes_to_secs(Phase::Break, break_min)?,
        })
    }

    /// Parse raw user input (e.g. text fields or prompt answers).
    pub fn parse(work: &str, break_: &str) -> Result<Self, TimerError> {
        Ok(Self {
            work_secs: minutes_to_secs(Phase::Work, parse_minutes(Phase::Work, work)?)?,
            break_secs: minutes_to_secs(Phase::Break, parse_minutes(Phase::Break, break_)?)?,
        })
    }

    pub fn duration_secs(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::Break => self.break_secs,
        }
    }
}

impl Default for TimerConfiguration {
    fn default() -> Self {
        Self {
            work_secs: DEFAULT_WORK_MIN * 60,
            break_secs: DEFAULT_BREAK_MIN * 60,
        }
    }
}

fn minutes_to_secs(phase: Phase, minutes: i64) -> Result<u64, TimerError> {
    if minutes <= 0 {
        return Err(TimerError::invalid_duration(phase, minutes));
    }
    (minutes as u64)
        .checked_mul(60)
        .ok_or_else(|| TimerError::invalid_duration(phase, minutes))
}

/// Parse a minutes value typed by the user.
///
/// Accepts whole numbers and decimals that round to a whole number
/// ("25", " 5 ", "24.6"). Anything else is an invalid duration.
pub fn parse_minutes(phase: Phase, raw: &str) -> Result<i64, TimerError> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.round() as i64),
        _ => Err(TimerError::invalid_duration(phase, trimmed)),
    }
}
