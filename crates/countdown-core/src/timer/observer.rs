use super::preset::TimerConfig;
use super::state::TimerState;

/// Presentation side of the engine.
///
/// `on_state_change` fires on every transition, including each tick.
/// `on_complete` fires once per countdown that reaches zero, after the
/// matching `on_state_change`. Implementations own their failures (a cue
/// that cannot play is logged, never reported back).
pub trait TimerObserver {
    fn on_state_change(&mut self, state: &TimerState, config: &TimerConfig);

    fn on_complete(&mut self, _state: &TimerState) {}
}

impl TimerObserver for () {
    fn on_state_change(&mut self, _state: &TimerState, _config: &TimerConfig) {}
}

/// Records every notification in order.
#[derive(Debug, Default, Clone)]
pub struct StateRecorder {
    pub states: Vec<TimerState>,
    pub completions: usize,
}

impl StateRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&TimerState> {
        self.states.last()
    }
}

impl TimerObserver for StateRecorder {
    fn on_state_change(&mut self, state: &TimerState, _config: &TimerConfig) {
        self.states.push(*state);
    }

    fn on_complete(&mut self, _state: &TimerState) {
        self.completions += 1;
    }
}
