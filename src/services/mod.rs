//! External collaborators module
//! 
//! This module contains the notification cue players and host capability checks.

pub mod cue;
pub mod system;

// Re-export main types
pub use cue::{CommandCuePlayer, Cue, CuePlayer, SilentCuePlayer};
pub use system::check_cue_program_available;
