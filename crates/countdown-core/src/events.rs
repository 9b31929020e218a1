use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every engine transition produces an Event.
/// The CLI prints them in `--json` mode; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PresetChanged {
        total_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        remaining_seconds: u64,
        total_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerTicked {
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. Emitted once per countdown.
    TimerCompleted {
        total_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        remaining_seconds: u64,
        total_seconds: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, used for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::PresetChanged { .. } => "preset_changed",
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerResumed { .. } => "timer_resumed",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerTicked { .. } => "timer_ticked",
            Event::TimerCompleted { .. } => "timer_completed",
            Event::TimerReset { .. } => "timer_reset",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
