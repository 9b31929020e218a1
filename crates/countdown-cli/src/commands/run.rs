use clap::Args;
use countdown_core::timer::TimerObserver;
use countdown_core::{
    parse_duration, Config, Event, Phase, TimerConfig, TimerEngine, TimerError, TokioScheduler,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::view::TerminalView;

#[derive(Args)]
pub struct RunArgs {
    /// Duration, e.g. "300", "5m", "1h30m", "25:00"
    #[arg(short, long, conflicts_with = "preset")]
    duration: Option<String>,
    /// Preset label or 1-based index
    #[arg(short, long)]
    preset: Option<String>,
    /// Start counting immediately
    #[arg(long)]
    start: bool,
    /// Exit once the countdown completes
    #[arg(long)]
    exit_on_complete: bool,
    /// Print every event as a JSON line instead of drawing
    #[arg(long)]
    json: bool,
}

/// One line typed on stdin while the countdown is running.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Toggle,
    Start,
    Pause,
    Reset,
    Preset(usize),
    Duration(u64),
    Help,
    Quit,
}

const HELP: &str = "commands: [enter]/t toggle, s start, p pause, r reset, \
1..n preset, d <duration> custom, h help, q quit";

impl Input {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head.to_ascii_lowercase().as_str() {
            "" | "t" | "toggle" => Ok(Input::Toggle),
            "s" | "start" => Ok(Input::Start),
            "p" | "pause" => Ok(Input::Pause),
            "r" | "reset" => Ok(Input::Reset),
            "h" | "help" | "?" => Ok(Input::Help),
            "q" | "quit" | "exit" => Ok(Input::Quit),
            "d" | "duration" => parse_duration(rest)
                .map(Input::Duration)
                .map_err(|e| e.to_string()),
            other => other
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(Input::Preset)
                .ok_or_else(|| format!("unknown command '{other}' ({HELP})")),
        }
    }
}

fn resolve_seconds(args: &RunArgs, config: &Config) -> Result<u64, Box<dyn std::error::Error>> {
    if let Some(duration) = args.duration.as_deref() {
        return Ok(parse_duration(duration)?);
    }
    if let Some(query) = args.preset.as_deref() {
        return config
            .find_preset(query)
            .map(|p| p.seconds)
            .ok_or_else(|| format!("unknown preset: {query}").into());
    }
    Ok(config.timer_config()?.total_seconds())
}

fn emit(json: bool, event: Option<Event>) -> Result<(), serde_json::Error> {
    if let Some(event) = event {
        debug!(kind = event.kind(), "event");
        if json {
            println!("{}", serde_json::to_string(&event)?);
        }
    }
    Ok(())
}

fn apply<O: TimerObserver>(
    engine: &mut TimerEngine<TokioScheduler, O>,
    config: &Config,
    input: Input,
) -> Result<Option<Event>, TimerError> {
    Ok(match input {
        Input::Toggle => engine.toggle(),
        Input::Start => engine.start(),
        Input::Pause => engine.pause(),
        Input::Reset => engine.reset(),
        Input::Duration(seconds) => Some(engine.set_preset(seconds)?),
        Input::Preset(n) => match config.presets.get(n - 1) {
            Some(preset) => {
                info!(label = %preset.label, seconds = preset.seconds, "preset selected");
                Some(engine.apply_preset(preset)?)
            }
            None => {
                eprintln!("no preset #{n} ({} configured)", config.presets.len());
                None
            }
        },
        Input::Help | Input::Quit => None,
    })
}

pub async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let timer_config = TimerConfig::new(resolve_seconds(&args, &config)?)?;

    let (scheduler, mut ticks) = TokioScheduler::new();
    let view = TerminalView::new(&config, args.json);
    let mut engine = TimerEngine::new(timer_config, scheduler, view);

    engine.refresh();
    emit(args.json, Some(engine.snapshot()))?;
    if args.start {
        emit(args.json, engine.start())?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    // Registered once so a signal between loop iterations is not lost.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(handle) = ticks.recv() => {
                emit(args.json, engine.handle_tick(handle))?;
                if engine.phase() == Phase::Completed && args.exit_on_complete {
                    break;
                }
                if !stdin_open && engine.phase() != Phase::Running {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match Input::parse(&line) {
                        Ok(Input::Quit) => break,
                        Ok(Input::Help) => eprintln!("{HELP}"),
                        Ok(input) => match apply(&mut engine, &config, input) {
                            Ok(event) => emit(args.json, event)?,
                            Err(e) => eprintln!("{e}"),
                        },
                        Err(e) => eprintln!("{e}"),
                    },
                    None => {
                        debug!("stdin closed");
                        stdin_open = false;
                        if engine.phase() != Phase::Running {
                            break;
                        }
                    }
                }
            }
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    warn!("ctrl-c handler failed: {e}");
                }
                break;
            }
        }
    }

    if !args.json && engine.phase() != Phase::Completed {
        println!();
    }
    Ok(())
}
