use serde::{Deserialize, Serialize};

/// Lifecycle stage of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Ready,
    Running,
    Paused,
    Completed,
}

/// Observable state of the engine.
///
/// `remaining_seconds` stays within `0..=total_seconds` of the active
/// [`TimerConfig`](super::TimerConfig) and only grows on reset or preset change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub phase: Phase,
}

impl TimerState {
    /// Fresh state for a countdown of `total_seconds`.
    pub fn ready(total_seconds: u64) -> Self {
        Self {
            remaining_seconds: total_seconds,
            phase: Phase::Ready,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}
