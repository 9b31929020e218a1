//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use
//! internal threads - it asks a [`TickScheduler`] for a recurring one-second
//! tick and the driver feeds fired handles back through `handle_tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Ready -> Running -> Paused -> Running
//! Running -> Completed            (tick reaches zero)
//! any -> Ready                    (reset / set_preset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(config, scheduler, observer);
//! engine.start();
//! // Whenever the scheduler fires:
//! engine.handle_tick(handle); // Returns Some(Event) for live ticks
//! ```

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, trace};

use super::observer::TimerObserver;
use super::preset::{Preset, TimerConfig};
use super::scheduler::{ManualScheduler, TickHandle, TickScheduler};
use super::state::{Phase, TimerState};
use crate::error::TimerError;
use crate::events::Event;
use crate::render;

/// Interval between two ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Core timer engine.
///
/// Owns at most one scheduled tick at a time. Every transition that is not
/// a tick cancels that tick before touching state.
#[derive(Debug)]
pub struct TimerEngine<S, O> {
    config: TimerConfig,
    state: TimerState,
    tick: Option<TickHandle>,
    scheduler: S,
    observer: O,
}

impl<S: TickScheduler, O: TimerObserver> TimerEngine<S, O> {
    /// Create a new engine in the `Ready` phase with the full duration remaining.
    pub fn new(config: TimerConfig, scheduler: S, observer: O) -> Self {
        Self {
            config,
            state: TimerState::ready(config.total_seconds()),
            tick: None,
            scheduler,
            observer,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    /// Handle of the active recurring tick, if any.
    pub fn active_tick(&self) -> Option<TickHandle> {
        self.tick
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.state.phase,
            remaining_seconds: self.state.remaining_seconds,
            total_seconds: self.config.total_seconds(),
            progress_pct: render::progress_percent(
                self.state.remaining_seconds,
                self.config.total_seconds(),
            ),
            at: Utc::now(),
        }
    }

    /// Push the current state to the observer without changing anything.
    pub fn refresh(&mut self) {
        self.notify();
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the duration and return to `Ready`.
    ///
    /// A zero duration is rejected and leaves the engine untouched.
    pub fn set_preset(&mut self, seconds: u64) -> Result<Event, TimerError> {
        let config = TimerConfig::new(seconds)?;
        self.cancel_tick();
        self.config = config;
        self.state = TimerState::ready(seconds);
        debug!(total_seconds = seconds, "preset changed");
        self.notify();
        Ok(Event::PresetChanged {
            total_seconds: seconds,
            at: Utc::now(),
        })
    }

    pub fn apply_preset(&mut self, preset: &Preset) -> Result<Event, TimerError> {
        self.set_preset(preset.seconds)
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.state.remaining_seconds == 0 {
            return None;
        }
        let resumed = match self.state.phase {
            Phase::Ready => false,
            Phase::Paused => true,
            Phase::Running | Phase::Completed => return None,
        };

        self.cancel_tick();
        self.tick = Some(self.scheduler.schedule(TICK_PERIOD));
        self.state.phase = Phase::Running;
        debug!(
            remaining_seconds = self.state.remaining_seconds,
            resumed, "timer running"
        );
        self.notify();

        let remaining_seconds = self.state.remaining_seconds;
        let at = Utc::now();
        Some(if resumed {
            Event::TimerResumed {
                remaining_seconds,
                at,
            }
        } else {
            Event::TimerStarted {
                remaining_seconds,
                total_seconds: self.config.total_seconds(),
                at,
            }
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state.phase != Phase::Running {
            return None;
        }
        self.cancel_tick();
        self.state.phase = Phase::Paused;
        debug!(remaining_seconds = self.state.remaining_seconds, "timer paused");
        self.notify();
        Some(Event::TimerPaused {
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Pause while running, otherwise start.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.state.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.cancel_tick();
        self.state = TimerState::ready(self.config.total_seconds());
        debug!(total_seconds = self.config.total_seconds(), "timer reset");
        self.notify();
        Some(Event::TimerReset {
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second.
    ///
    /// Only has an effect while `Running`. Returns `Some(Event::TimerCompleted)`
    /// on the tick that reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state.phase != Phase::Running {
            return None;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);

        if self.state.remaining_seconds == 0 {
            self.cancel_tick();
            self.state.phase = Phase::Completed;
            debug!(total_seconds = self.config.total_seconds(), "timer completed");
            self.notify();
            self.observer.on_complete(&self.state);
            return Some(Event::TimerCompleted {
                total_seconds: self.config.total_seconds(),
                at: Utc::now(),
            });
        }

        self.notify();
        Some(Event::TimerTicked {
            remaining_seconds: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Entry point for schedulers: run `tick()` if `handle` is the live tick.
    ///
    /// Handles that were cancelled (or never belonged to this engine) are
    /// dropped, so a fire already in flight when the tick was cancelled has
    /// no effect.
    pub fn handle_tick(&mut self, handle: TickHandle) -> Option<Event> {
        if self.tick != Some(handle) {
            trace!(handle = handle.id(), "ignoring stale tick");
            return None;
        }
        self.tick()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn notify(&mut self) {
        self.observer.on_state_change(&self.state, &self.config);
    }
}

impl<O: TimerObserver> TimerEngine<ManualScheduler, O> {
    /// Move simulated time forward, delivering every tick that falls due.
    pub fn advance(&mut self, by: Duration) -> Vec<Event> {
        let until = self.scheduler.now() + by;
        let mut events = Vec::new();
        while let Some(handle) = self.scheduler.pop_due(until) {
            events.extend(self.handle_tick(handle));
        }
        self.scheduler.settle(until);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::StateRecorder;

    type TestEngine = TimerEngine<ManualScheduler, StateRecorder>;

    fn engine(seconds: u64) -> TestEngine {
        TimerEngine::new(
            TimerConfig::new(seconds).unwrap(),
            ManualScheduler::new(),
            StateRecorder::new(),
        )
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn starts_ready_with_full_duration() {
        let engine = engine(300);
        assert_eq!(engine.state(), TimerState::ready(300));
        assert!(engine.active_tick().is_none());
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = engine(60);

        assert!(matches!(engine.start(), Some(Event::TimerStarted { .. })));
        assert_eq!(engine.phase(), Phase::Running);

        assert!(matches!(engine.pause(), Some(Event::TimerPaused { .. })));
        assert_eq!(engine.phase(), Phase::Paused);

        assert!(matches!(engine.start(), Some(Event::TimerResumed { .. })));
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn three_ticks_complete_exactly_once() {
        let mut engine = engine(3);
        engine.start();

        let mut phases = Vec::new();
        for _ in 0..3 {
            engine.advance(secs(1));
            phases.push(engine.phase());
        }
        assert_eq!(phases, [Phase::Running, Phase::Running, Phase::Completed]);
        assert_eq!(engine.observer().completions, 1);

        // No further ticks once completed.
        assert!(engine.advance(secs(5)).is_empty());
        assert_eq!(engine.observer().completions, 1);
        assert_eq!(engine.state().remaining_seconds, 0);
        assert_eq!(engine.scheduler().active_count(), 0);
    }

    #[test]
    fn start_twice_keeps_single_tick() {
        let mut engine = engine(10);
        assert!(engine.start().is_some());
        assert!(engine.start().is_none());
        assert_eq!(engine.scheduler().active_count(), 1);

        engine.advance(secs(1));
        assert_eq!(engine.state().remaining_seconds, 9);
    }

    #[test]
    fn pause_twice_is_idempotent() {
        let mut engine = engine(10);
        engine.start();
        engine.advance(secs(2));

        engine.pause();
        let after_first = engine.state();
        let notifications = engine.observer().states.len();

        assert!(engine.pause().is_none());
        assert_eq!(engine.state(), after_first);
        assert_eq!(engine.observer().states.len(), notifications);
    }

    #[test]
    fn pause_without_tick_is_noop() {
        let mut engine = engine(10);
        assert!(engine.pause().is_none());
        assert_eq!(engine.phase(), Phase::Ready);
    }

    #[test]
    fn paused_engine_does_not_count_down() {
        let mut engine = engine(10);
        engine.start();
        engine.advance(secs(3));
        engine.pause();
        engine.advance(secs(30));
        assert_eq!(engine.state().remaining_seconds, 7);

        engine.start();
        engine.advance(secs(1));
        assert_eq!(engine.state().remaining_seconds, 6);
    }

    #[test]
    fn toggle_flips_between_running_and_paused() {
        let mut engine = engine(10);
        engine.toggle();
        assert_eq!(engine.phase(), Phase::Running);
        engine.toggle();
        assert_eq!(engine.phase(), Phase::Paused);
        engine.toggle();
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn toggle_after_completion_is_noop() {
        let mut engine = engine(1);
        engine.start();
        engine.advance(secs(1));
        assert_eq!(engine.phase(), Phase::Completed);

        assert!(engine.toggle().is_none());
        assert_eq!(engine.phase(), Phase::Completed);
        assert!(engine.active_tick().is_none());
    }

    #[test]
    fn reset_restores_from_every_phase() {
        // Running
        let mut engine = engine(5);
        engine.start();
        engine.advance(secs(2));
        engine.reset();
        assert_eq!(engine.state(), TimerState::ready(5));
        assert_eq!(engine.scheduler().active_count(), 0);

        // Paused
        engine.start();
        engine.advance(secs(2));
        engine.pause();
        engine.reset();
        assert_eq!(engine.state(), TimerState::ready(5));

        // Completed
        engine.start();
        engine.advance(secs(5));
        assert_eq!(engine.phase(), Phase::Completed);
        engine.reset();
        assert_eq!(engine.state(), TimerState::ready(5));
    }

    #[test]
    fn completed_timer_can_run_again_after_reset() {
        let mut engine = engine(2);
        engine.start();
        engine.advance(secs(2));
        engine.reset();
        engine.start();
        engine.advance(secs(2));
        assert_eq!(engine.observer().completions, 2);
    }

    #[test]
    fn set_preset_stops_and_replaces() {
        let mut engine = engine(60);
        engine.start();
        engine.advance(secs(5));

        let event = engine.set_preset(900).unwrap();
        assert!(matches!(event, Event::PresetChanged { total_seconds: 900, .. }));
        assert_eq!(engine.state(), TimerState::ready(900));
        assert_eq!(engine.config().total_seconds(), 900);
        assert_eq!(engine.observer().last(), Some(&TimerState::ready(900)));
        assert_eq!(engine.scheduler().active_count(), 0);

        // The old tick must not fire into the new session.
        assert!(engine.advance(secs(3)).is_empty());
        assert_eq!(engine.state().remaining_seconds, 900);
    }

    #[test]
    fn invalid_preset_leaves_state_untouched() {
        let mut engine = engine(60);
        engine.start();
        engine.advance(secs(5));
        let before = engine.state();
        let notifications = engine.observer().states.len();

        let err = engine.set_preset(0).unwrap_err();
        assert!(matches!(err, TimerError::InvalidConfig { .. }));
        assert_eq!(engine.state(), before);
        assert_eq!(engine.config().total_seconds(), 60);
        assert_eq!(engine.observer().states.len(), notifications);

        // Still running on the original tick.
        engine.advance(secs(1));
        assert_eq!(engine.state().remaining_seconds, 54);
    }

    #[test]
    fn apply_preset_uses_seconds() {
        let mut engine = engine(60);
        let preset = Preset::new("Tea", 180).unwrap();
        engine.apply_preset(&preset).unwrap();
        assert_eq!(engine.state().remaining_seconds, 180);
    }

    #[test]
    fn stale_handle_is_ignored() {
        let mut engine = engine(10);
        engine.start();
        let old = engine.active_tick().unwrap();
        engine.pause();
        engine.start();

        assert!(engine.handle_tick(old).is_none());
        assert_eq!(engine.state().remaining_seconds, 10);

        let live = engine.active_tick().unwrap();
        assert!(engine.handle_tick(live).is_some());
        assert_eq!(engine.state().remaining_seconds, 9);
    }

    #[test]
    fn direct_tick_outside_running_is_noop() {
        let mut engine = engine(10);
        assert!(engine.tick().is_none());
        assert_eq!(engine.state().remaining_seconds, 10);
    }

    #[test]
    fn observer_sees_every_transition() {
        let mut engine = engine(2);
        engine.start();
        engine.advance(secs(1));
        engine.pause();
        engine.start();
        engine.advance(secs(1));
        engine.reset();

        let phases: Vec<Phase> = engine.observer().states.iter().map(|s| s.phase).collect();
        assert_eq!(
            phases,
            [
                Phase::Running,   // start
                Phase::Running,   // tick -> 1
                Phase::Paused,    // pause
                Phase::Running,   // resume
                Phase::Completed, // tick -> 0
                Phase::Ready,     // reset
            ]
        );
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let mut engine = engine(300);
        engine.start();
        engine.advance(secs(150));
        match engine.snapshot() {
            Event::StateSnapshot {
                phase,
                remaining_seconds,
                total_seconds,
                progress_pct,
                ..
            } => {
                assert_eq!(phase, Phase::Running);
                assert_eq!(remaining_seconds, 150);
                assert_eq!(total_seconds, 300);
                assert_eq!(progress_pct, 50.0);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
