//! Pomodoro Timer - A drift-resistant work/break countdown service
//! 
//! This library provides a wall-clock countdown engine, a work/break cycle
//! built on top of it, and an HTTP surface to control and observe the cycle.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
