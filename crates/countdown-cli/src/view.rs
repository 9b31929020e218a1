//! Terminal front end: redraws a single status line and plays the
//! completion cue.

use std::io::Write;
use std::process::{Child, Command, Stdio};

use countdown_core::render::{
    active_preset, format_time, progress_percent, status_label, text_bar,
};
use countdown_core::storage::CueConfig;
use countdown_core::{Config, Phase, Preset, TimerConfig, TimerObserver, TimerState};
use tracing::{debug, warn};

pub struct TerminalView {
    /// In JSON mode stdout carries events only, so nothing is drawn.
    draw: bool,
    bar_width: usize,
    cue: CueConfig,
    presets: Vec<Preset>,
    /// Cue command still playing, if any. Stopped on reset.
    cue_child: Option<Child>,
}

impl TerminalView {
    pub fn new(config: &Config, json: bool) -> Self {
        Self {
            draw: !json,
            bar_width: config.ui.bar_width as usize,
            cue: config.cue.clone(),
            presets: config.presets.clone(),
            cue_child: None,
        }
    }

    fn draw_line(&self, state: &TimerState, config: &TimerConfig) -> std::io::Result<()> {
        let percent = progress_percent(state.remaining_seconds, config.total_seconds());
        let mut out = std::io::stdout().lock();
        write!(
            out,
            "\r\x1b[2K{:<9} {}  {} {:>3.0}%",
            status_label(state.phase),
            format_time(state.remaining_seconds),
            text_bar(percent, self.bar_width),
            percent,
        )?;
        if let Some(i) = active_preset(&self.presets, config.total_seconds()) {
            write!(out, "  [{}]", self.presets[i].label)?;
        }
        if state.phase == Phase::Completed {
            writeln!(out)?;
        }
        out.flush()
    }

    fn play_cue(&mut self) {
        if !self.cue.enabled {
            return;
        }
        if self.cue.bell {
            let mut err = std::io::stderr().lock();
            if let Err(e) = err.write_all(b"\x07").and_then(|_| err.flush()) {
                warn!("completion bell failed: {e}");
            }
        }
        if let Some(command) = self.cue.command.clone() {
            self.stop_cue();
            match spawn_cue(&command) {
                Ok(child) => self.cue_child = Some(child),
                Err(e) => warn!(command, "completion cue failed: {e}"),
            }
        }
    }

    /// Kill a cue that is still playing and reap it.
    fn stop_cue(&mut self) {
        let Some(mut child) = self.cue_child.take() else {
            return;
        };
        if let Err(e) = child.kill() {
            // Already exited between checks.
            debug!("cue kill: {e}");
        }
        if let Err(e) = child.wait() {
            warn!("failed to reap cue process: {e}");
        }
    }

    /// Drop the handle once the cue has finished on its own.
    fn reap_cue(&mut self) {
        let finished = match self.cue_child.as_mut().map(Child::try_wait) {
            Some(Ok(Some(_))) => true,
            Some(Ok(None)) | None => false,
            Some(Err(e)) => {
                warn!("failed to poll cue process: {e}");
                true
            }
        };
        if finished {
            self.cue_child = None;
        }
    }
}

/// Start the cue command; the countdown never waits on it.
fn spawn_cue(command: &str) -> std::io::Result<Child> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "cue command is empty")
    })?;
    Command::new(program)
        .args(parts)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

impl TimerObserver for TerminalView {
    fn on_state_change(&mut self, state: &TimerState, config: &TimerConfig) {
        if state.phase == Phase::Ready {
            self.stop_cue();
        } else {
            self.reap_cue();
        }
        if !self.draw {
            return;
        }
        if let Err(e) = self.draw_line(state, config) {
            warn!("failed to draw timer: {e}");
        }
    }

    fn on_complete(&mut self, _state: &TimerState) {
        self.play_cue();
    }
}
