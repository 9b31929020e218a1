//! Presentation projection.
//!
//! Pure mappings from engine state to what a front end shows: the `MM:SS`
//! readout, the status line, the progress ring geometry and the
//! start/pause control. Nothing here touches a terminal or a DOM.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::timer::{Phase, Preset, TimerConfig, TimerState};

/// `MM:SS`, zero padded. Minutes are not capped at 99.
pub fn format_time(remaining_seconds: u64) -> String {
    let minutes = remaining_seconds / 60;
    let seconds = remaining_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Share of the countdown still left, clamped to `0.0..=100.0`.
pub fn progress_percent(remaining_seconds: u64, total_seconds: u64) -> f64 {
    if total_seconds == 0 {
        return 0.0;
    }
    (remaining_seconds as f64 / total_seconds as f64 * 100.0).clamp(0.0, 100.0)
}

pub fn status_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Ready => "Ready",
        Phase::Running => "Focus",
        Phase::Paused => "Paused",
        Phase::Completed => "Completed",
    }
}

/// Text on the start/pause button.
pub fn control_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Running => "Pause",
        _ => "Start",
    }
}

/// Icon on the start/pause button.
pub fn control_icon(phase: Phase) -> &'static str {
    match phase {
        Phase::Running => "pause",
        _ => "play",
    }
}

/// Index of the preset the current duration came from, for highlighting.
///
/// The first preset with a matching length wins; a custom duration has none.
pub fn active_preset(presets: &[Preset], total_seconds: u64) -> Option<usize> {
    presets.iter().position(|p| p.seconds == total_seconds)
}

/// Circular progress indicator drawn with a dashed stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressRing {
    pub radius: f64,
}

impl ProgressRing {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }

    /// Value for `stroke-dasharray`.
    pub fn dash_array(&self) -> String {
        let c = self.circumference();
        format!("{c} {c}")
    }

    /// Value for `stroke-dashoffset`: 0 when full, the circumference when empty.
    pub fn dash_offset(&self, percent: f64) -> f64 {
        let c = self.circumference();
        c - (percent.clamp(0.0, 100.0) / 100.0) * c
    }
}

/// Everything a view needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub time_text: String,
    pub status: String,
    pub progress_pct: f64,
    pub dash_offset: f64,
    pub control_label: String,
    pub control_icon: String,
    /// 0-based index into the preset list, if the duration matches one.
    pub active_preset: Option<usize>,
}

impl RenderFrame {
    pub fn project(
        state: &TimerState,
        config: &TimerConfig,
        ring: &ProgressRing,
        presets: &[Preset],
    ) -> Self {
        let progress_pct = progress_percent(state.remaining_seconds, config.total_seconds());
        Self {
            time_text: format_time(state.remaining_seconds),
            status: status_label(state.phase).to_string(),
            progress_pct,
            dash_offset: ring.dash_offset(progress_pct),
            control_label: control_label(state.phase).to_string(),
            control_icon: control_icon(state.phase).to_string(),
            active_preset: active_preset(presets, config.total_seconds()),
        }
    }
}

/// Fixed-width bar for terminals. `width` cells, filled proportionally.
pub fn text_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat('█').take(filled));
    bar.extend(std::iter::repeat('░').take(width - filled));
    bar
}
