//! # pomotick Core Library
//!
//! The countdown core of the pomotick Pomodoro timer. Front ends (the
//! `pomotick` CLI, or anything else) mount a [`TimerWidget`] and render the
//! [`Event`]s it produces.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: runs on its own tokio task, counts down to an
//!   absolute end time and reports whole seconds remaining once per second
//! - **Timer Presenter**: UI-side state (displayed duration, progress,
//!   running/paused/idle) driven only by four commands and engine outputs
//! - **Storage**: TOML configuration for mode defaults and cue preferences
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: isolated countdown task
//! - [`TimerPresenter`]: presentation state machine
//! - [`TimerWidget`]: presenter + engine + completion cue
//! - [`Config`]: application configuration management

pub mod cue;
pub mod engine;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;
pub mod widget;

pub use cue::{CompletionCue, SilentCue, TerminalBell};
pub use engine::{
    Clock, Countdown, CountdownEngine, EngineCommand, EngineOutput, MonotonicClock, OutputReceiver,
    StampedOutput, SystemClock,
};
pub use error::{ConfigError, CoreError, EngineError, Result, ValidationError};
pub use events::Event;
pub use storage::Config;
pub use timer::{Mode, ModeDurations, TimeUnit, TimerDuration, TimerPresenter, TimerState};
pub use widget::{Intent, TimerWidget};
