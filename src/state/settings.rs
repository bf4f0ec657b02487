//! Work/break modes and their durations

use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

use super::countdown::duration_ms_from_secs;

pub const DEFAULT_WORK_DURATION_MS: u64 = 50 * 60 * 1000;
pub const DEFAULT_BREAK_DURATION_MS: u64 = 10 * 60 * 1000;

/// Which half of the cycle is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Work,
    Break,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::Break => "break",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Mode::Work),
            "break" => Ok(Mode::Break),
            other => Err(format!("Invalid mode: {}", other)),
        }
    }
}

/// Durations for each mode, fixed for the lifetime of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    pub work_duration_ms: u64,
    pub break_duration_ms: u64,
}

impl PomodoroSettings {
    /// Apply optional overrides, given in seconds, on top of the defaults.
    ///
    /// Fractions are kept to the millisecond; negative or non-finite values
    /// are clamped to zero.
    pub fn from_overrides(work_seconds: Option<f64>, break_seconds: Option<f64>) -> Self {
        let defaults = Self::default();
        Self {
            work_duration_ms: work_seconds
                .map(duration_ms_from_secs)
                .unwrap_or(defaults.work_duration_ms),
            break_duration_ms: break_seconds
                .map(duration_ms_from_secs)
                .unwrap_or(defaults.break_duration_ms),
        }
    }

    pub fn duration_ms(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Work => self.work_duration_ms,
            Mode::Break => self.break_duration_ms,
        }
    }

    pub fn duration_seconds(&self, mode: Mode) -> f64 {
        self.duration_ms(mode) as f64 / 1000.0
    }
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration_ms: DEFAULT_WORK_DURATION_MS,
            break_duration_ms: DEFAULT_BREAK_DURATION_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fifty_and_ten_minutes() {
        let settings = PomodoroSettings::default();
        assert_eq!(settings.duration_ms(Mode::Work), 3_000_000);
        assert_eq!(settings.duration_ms(Mode::Break), 600_000);
        assert_eq!(settings.duration_seconds(Mode::Break), 600.0);
    }

    #[test]
    fn overrides_fall_back_per_field() {
        let settings = PomodoroSettings::from_overrides(Some(1500.0), None);
        assert_eq!(settings.work_duration_ms, 1_500_000);
        assert_eq!(settings.break_duration_ms, 600_000);
    }

    #[test]
    fn fractional_overrides_keep_millisecond_precision() {
        let settings = PomodoroSettings::from_overrides(Some(1.5), Some(0.5));
        assert_eq!(settings.duration_ms(Mode::Work), 1_500);
        assert_eq!(settings.duration_ms(Mode::Break), 500);
    }

    #[test]
    fn invalid_overrides_clamp_to_zero() {
        let settings = PomodoroSettings::from_overrides(Some(-30.0), Some(f64::NAN));
        assert_eq!(settings.work_duration_ms, 0);
        assert_eq!(settings.break_duration_ms, 0);
    }

    #[test]
    fn mode_parses_only_known_names() {
        assert_eq!("work".parse::<Mode>(), Ok(Mode::Work));
        assert_eq!("break".parse::<Mode>(), Ok(Mode::Break));
        assert!("lunch".parse::<Mode>().is_err());
        assert!("Work".parse::<Mode>().is_err());
    }

    #[test]
    fn mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Break).unwrap(), "\"break\"");
    }
}
