mod engine;
mod observer;
mod preset;
mod scheduler;
mod state;
mod tokio_scheduler;

pub use engine::{TimerEngine, TICK_PERIOD};
pub use observer::{StateRecorder, TimerObserver};
pub use preset::{parse_duration, Preset, TimerConfig};
pub use scheduler::{ManualScheduler, TickHandle, TickScheduler};
pub use state::{Phase, TimerState};
pub use tokio_scheduler::{TickReceiver, TokioScheduler};
