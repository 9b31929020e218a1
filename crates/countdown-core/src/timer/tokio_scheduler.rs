//! Tick source backed by the Tokio timer.
//!
//! Each scheduled handle gets its own `interval` task that pushes the handle
//! into an unbounded channel every period. The task never touches engine
//! state; the receiving loop hands the handle to the engine, which drops it
//! if it was cancelled in the meantime.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::scheduler::{TickHandle, TickScheduler};

/// Receiving end of a [`TokioScheduler`].
pub type TickReceiver = mpsc::UnboundedReceiver<TickHandle>;

/// Must be used from inside a Tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    next_id: u64,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
    tx: mpsc::UnboundedSender<TickHandle>,
}

impl TokioScheduler {
    pub fn new() -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            tasks: HashMap::new(),
            tx,
        };
        (scheduler, rx)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule(&mut self, period: Duration) -> TickHandle {
        let handle = TickHandle::new(self.next_id);
        self.next_id += 1;

        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });

        tracing::trace!(handle = handle.id(), "tick task spawned");
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            tracing::trace!(handle = handle.id(), "tick task aborted");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
