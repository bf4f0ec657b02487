//! Utility functions module
//! 
//! This module contains utility functions used throughout the application.

pub mod clock;
pub mod signals;
#[cfg(test)]
pub mod testing;

// Re-export main functions
pub use clock::{Clock, MonotonicClock};
pub use signals::shutdown_signal;
