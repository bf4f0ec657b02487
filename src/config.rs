//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::state::PomodoroSettings;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-timer")]
#[command(about = "A work/break countdown service with an HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Work session length in seconds (negative values count as zero)
    #[arg(short, long, allow_negative_numbers = true)]
    pub work_seconds: Option<f64>,

    /// Break length in seconds (negative values count as zero)
    #[arg(short, long, allow_negative_numbers = true)]
    pub break_seconds: Option<f64>,

    /// How often a running countdown recomputes its remaining time, in milliseconds
    #[arg(long, default_value = "100")]
    pub frame_ms: u64,

    /// Audio program used to play cues
    #[arg(long, default_value = "paplay")]
    pub cue_program: String,

    /// Directory holding the cue audio files
    #[arg(long, default_value = "sounds")]
    pub sounds_dir: String,

    /// Log cues instead of playing them
    #[arg(short, long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Mode durations with defaults filled in
    pub fn settings(&self) -> PomodoroSettings {
        PomodoroSettings::from_overrides(self.work_seconds, self.break_seconds)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}
