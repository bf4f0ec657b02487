//! Background tasks module
//! 
//! This module contains the scheduling primitives and the background tasks
//! that run alongside the HTTP server.

pub mod countdown_driver;
pub mod scheduler;
pub mod status_reporter;

// Re-export main functions
pub use countdown_driver::countdown_driver_task;
pub use scheduler::{Cancel, Scheduler, TaskHandle, TimerSignal, TokioScheduler, Wakeup};
pub use status_reporter::status_reporter_task;
