use clap::{Args, ValueEnum};
use countdown_core::{Config, Phase, ProgressRing, RenderFrame, TimerConfig, TimerState};

#[derive(Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    Ready,
    Running,
    Paused,
    Completed,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Ready => Phase::Ready,
            PhaseArg::Running => Phase::Running,
            PhaseArg::Paused => Phase::Paused,
            PhaseArg::Completed => Phase::Completed,
        }
    }
}

#[derive(Args)]
pub struct RenderArgs {
    /// Seconds left
    remaining: u64,
    /// Total seconds of the countdown
    total: u64,
    /// Phase to render
    #[arg(long, value_enum, default_value = "running")]
    phase: PhaseArg,
    /// Progress ring radius [default: ui.ring_radius from the config file]
    #[arg(long)]
    radius: Option<f64>,
}

pub fn run(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = TimerConfig::new(args.total)?;
    if args.remaining > config.total_seconds() {
        return Err(format!(
            "remaining ({}) must not exceed total ({})",
            args.remaining, args.total
        )
        .into());
    }
    let state = TimerState {
        remaining_seconds: args.remaining,
        phase: args.phase.into(),
    };
    let settings = Config::load()?;
    let radius = args.radius.unwrap_or(settings.ui.ring_radius);
    let frame = RenderFrame::project(
        &state,
        &config,
        &ProgressRing::new(radius),
        &settings.presets,
    );
    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}
