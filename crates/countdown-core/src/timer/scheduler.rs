//! Recurring tick sources.
//!
//! The engine never owns a thread. It asks a [`TickScheduler`] for a
//! recurring tick and gets back a [`TickHandle`]; whoever drives the
//! scheduler feeds fired handles back through
//! [`TimerEngine::handle_tick`](super::TimerEngine::handle_tick).

use std::collections::BTreeMap;
use std::time::Duration;

/// Identifies one scheduled recurring tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Something that can fire a callback every `period` until cancelled.
pub trait TickScheduler {
    /// Start a recurring tick. The first fire happens one `period` from now.
    fn schedule(&mut self, period: Duration) -> TickHandle;

    /// Stop a recurring tick. Cancelling an unknown handle is a no-op.
    fn cancel(&mut self, handle: TickHandle);
}

#[derive(Debug, Clone, Copy)]
struct Recurring {
    period: Duration,
    next_due: Duration,
}

/// Simulated clock for tests and headless drivers.
///
/// Time only moves when the driver asks for due ticks via [`pop_due`](Self::pop_due).
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    active: BTreeMap<TickHandle, Recurring>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of recurring ticks currently scheduled.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, handle: TickHandle) -> bool {
        self.active.contains_key(&handle)
    }

    /// Pop the earliest tick due at or before `until`, moving the clock to it.
    ///
    /// The popped tick is rescheduled one period later, so repeated calls
    /// walk through every fire in the window in time order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TickHandle> {
        let (handle, due) = self
            .active
            .iter()
            .filter(|(_, r)| r.next_due <= until)
            .min_by_key(|(h, r)| (r.next_due, **h))
            .map(|(h, r)| (*h, r.next_due))?;

        if let Some(recurring) = self.active.get_mut(&handle) {
            recurring.next_due += recurring.period;
        }
        self.now = self.now.max(due);
        Some(handle)
    }

    /// Move the clock forward without firing anything.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, period: Duration) -> TickHandle {
        // A zero period would make `pop_due` spin forever.
        let period = period.max(Duration::from_millis(1));
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.active.insert(
            handle,
            Recurring {
                period,
                next_due: self.now + period,
            },
        );
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.active.remove(&handle);
    }
}
