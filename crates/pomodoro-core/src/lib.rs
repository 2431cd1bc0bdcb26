//! # Pomodoro Core Library
//!
//! This library provides the core logic for the Pomodoro timer. The
//! `pomodoro` CLI binary is a thin terminal front end over it.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine alternating work and
//!   break phases; the caller invokes `tick()` once per second
//! - **Events**: Every command returns the events it produced, for
//!   rendering and notification collaborators
//! - **Storage**: TOML-based user configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Event`]: Signals emitted by the engine
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, Result, TimerError};
pub use events::{dispatch, Event, Notifier};
pub use storage::Config;
pub use timer::{format_clock, Phase, Snapshot, TimerConfiguration, TimerEngine, TimerState};
