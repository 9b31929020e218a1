use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Duration selected for the current session.
///
/// Immutable once built; a preset change replaces it wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    total_seconds: u64,
}

impl TimerConfig {
    /// Build a config, rejecting a zero duration.
    pub fn new(total_seconds: u64) -> Result<Self, TimerError> {
        if total_seconds == 0 {
            return Err(TimerError::invalid("0", "duration must be greater than zero"));
        }
        Ok(Self { total_seconds })
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }
}

impl TryFrom<i64> for TimerConfig {
    type Error = TimerError;

    fn try_from(seconds: i64) -> Result<Self, Self::Error> {
        if seconds <= 0 {
            return Err(TimerError::invalid(
                seconds.to_string(),
                "duration must be greater than zero",
            ));
        }
        Self::new(seconds as u64)
    }
}

/// A named duration the user can pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub label: String,
    pub seconds: u64,
}

impl Preset {
    pub fn new(label: impl Into<String>, seconds: u64) -> Result<Self, TimerError> {
        TimerConfig::new(seconds)?;
        Ok(Self {
            label: label.into(),
            seconds,
        })
    }

    /// The presets shipped in a fresh config file.
    pub fn defaults() -> Vec<Preset> {
        vec![
            Preset {
                label: "Focus".into(),
                seconds: 25 * 60,
            },
            Preset {
                label: "Short Break".into(),
                seconds: 5 * 60,
            },
            Preset {
                label: "Long Break".into(),
                seconds: 15 * 60,
            },
        ]
    }
}

/// Parse a user supplied duration into whole seconds.
///
/// Accepted forms: `300`, `90s`, `5m`, `1h30m`, `25m30s`, `MM:SS`.
/// Anything that is zero, negative, fractional or malformed is rejected
/// with [`TimerError::InvalidConfig`].
pub fn parse_duration(input: &str) -> Result<u64, TimerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimerError::invalid(input, "duration is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(TimerError::invalid(input, "duration must be greater than zero"));
    }

    let seconds = if let Some((minutes, seconds)) = trimmed.split_once(':') {
        let minutes = parse_number(input, minutes)?;
        let seconds = parse_number(input, seconds)?;
        if seconds >= 60 {
            return Err(TimerError::invalid(input, "seconds field must be below 60"));
        }
        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(|| TimerError::invalid(input, "duration is too large"))?
    } else if trimmed.chars().all(|c| c.is_ascii_digit()) {
        parse_number(input, trimmed)?
    } else {
        parse_units(input, trimmed)?
    };

    if seconds == 0 {
        return Err(TimerError::invalid(input, "duration must be greater than zero"));
    }
    Ok(seconds)
}

fn parse_number(input: &str, digits: &str) -> Result<u64, TimerError> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(TimerError::invalid(input, "expected a whole number"));
    }
    digits
        .parse::<u64>()
        .map_err(|_| TimerError::invalid(input, "duration is too large"))
}

fn parse_units(input: &str, text: &str) -> Result<u64, TimerError> {
    let mut total: u64 = 0;
    let mut digits = String::new();
    let mut seen = [false; 3];

    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let (slot, factor) = match c.to_ascii_lowercase() {
            'h' => (0, 3600),
            'm' => (1, 60),
            's' => (2, 1),
            '.' | ',' => return Err(TimerError::invalid(input, "expected a whole number")),
            _ => return Err(TimerError::invalid(input, format!("unknown unit '{c}'"))),
        };
        if digits.is_empty() {
            return Err(TimerError::invalid(input, format!("missing number before '{c}'")));
        }
        if seen[slot] {
            return Err(TimerError::invalid(input, format!("unit '{c}' given twice")));
        }
        seen[slot] = true;

        let value = parse_number(input, &digits)?;
        digits.clear();
        total = value
            .checked_mul(factor)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| TimerError::invalid(input, "duration is too large"))?;
    }

    if !digits.is_empty() {
        return Err(TimerError::invalid(input, "trailing number without a unit"));
    }
    Ok(total)
}
