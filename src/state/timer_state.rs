//! Timer snapshot published to observers

use serde::{Deserialize, Serialize};

use super::settings::Mode;

/// Everything a display needs to render the timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: Mode,
    pub is_work_mode: bool,
    pub is_break_mode: bool,
    pub formatted_minutes: String,
    pub formatted_seconds: String,
    pub remaining_seconds: u64,
    pub running: bool,
    pub completed: bool,
}

impl TimerState {
    /// Display string in `MM:SS` form
    pub fn display(&self) -> String {
        format!("{}:{}", self.formatted_minutes, self.formatted_seconds)
    }
}
