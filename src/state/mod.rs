//! State management module
//! 
//! This module contains the countdown engine, the work/break cycle built on it,
//! and the shared application state that exposes both to the service.

pub mod app_state;
pub mod countdown;
pub mod pomodoro;
pub mod settings;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use countdown::Countdown;
pub use pomodoro::{Pomodoro, Transition};
pub use settings::{Mode, PomodoroSettings};
pub use timer_state::TimerState;
