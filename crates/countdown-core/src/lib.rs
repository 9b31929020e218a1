//! # Countdown Core Library
//!
//! Core logic for a single countdown timer. The CLI binary is one front end
//! over this crate; anything that can drive a tick source and draw a frame
//! can be another.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine that owns at most one
//!   scheduled recurring tick and reports every transition to an observer
//! - **Schedulers**: a simulated clock for tests and a Tokio-backed one for
//!   real time
//! - **Render**: pure projection from timer state to text, progress ring and
//!   control labels
//! - **Storage**: TOML-based user configuration (presets, cue, UI)
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerObserver`]: Presentation-side callback contract
//! - [`RenderFrame`]: One drawable frame
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod render;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, TimerError};
pub use events::Event;
pub use render::{ProgressRing, RenderFrame};
pub use storage::Config;
pub use timer::{
    parse_duration, ManualScheduler, Phase, Preset, TimerConfig, TimerEngine, TimerObserver,
    TimerState, TokioScheduler,
};
