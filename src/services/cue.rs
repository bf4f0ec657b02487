//! Notification cue playback
//!
//! Cues are fire-and-forget: a failure to play audio is logged and never
//! reaches the caller.

use std::{fmt, path::PathBuf, sync::Arc};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// A named notification fired on a mode transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    WorkComplete,
    BreakComplete,
}

impl Cue {
    pub fn id(&self) -> &'static str {
        match self {
            Cue::WorkComplete => "work-complete",
            Cue::BreakComplete => "break-complete",
        }
    }

    /// Default audio asset for the cue
    pub fn asset(&self) -> &'static str {
        match self {
            Cue::WorkComplete => "arise.mp3",
            Cue::BreakComplete => "atomic.mp3",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Capability to play a cue without blocking the caller
pub trait CuePlayer {
    fn play(&self, cue: Cue);
}

impl<T: CuePlayer + ?Sized> CuePlayer for Box<T> {
    fn play(&self, cue: Cue) {
        (**self).play(cue)
    }
}

impl<T: CuePlayer + ?Sized> CuePlayer for Arc<T> {
    fn play(&self, cue: Cue) {
        (**self).play(cue)
    }
}

/// Plays cues by running an external audio program on the asset file
#[derive(Debug, Clone)]
pub struct CommandCuePlayer {
    program: String,
    sounds_dir: PathBuf,
}

impl CommandCuePlayer {
    pub fn new(program: impl Into<String>, sounds_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            sounds_dir: sounds_dir.into(),
        }
    }

    pub fn asset_path(&self, cue: Cue) -> PathBuf {
        self.sounds_dir.join(cue.asset())
    }
}

impl CuePlayer for CommandCuePlayer {
    fn play(&self, cue: Cue) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("No async runtime available, skipping cue {}", cue);
                return;
            }
        };

        let program = self.program.clone();
        let asset = self.asset_path(cue);
        debug!("Playing cue {} with {} {}", cue, program, asset.display());

        runtime.spawn(async move {
            match Command::new(&program).arg(&asset).output().await {
                Ok(output) if output.status.success() => {
                    debug!("Cue {} finished", cue);
                }
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!("Cue {} playback failed: {}", cue, stderr.trim());
                }
                Err(e) => {
                    warn!("Failed to execute {} for cue {}: {}", program, cue, e);
                }
            }
        });
    }
}

/// Announces cues in the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    fn play(&self, cue: Cue) {
        info!("Cue: {}", cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_have_distinct_ids_and_assets() {
        assert_eq!(Cue::WorkComplete.id(), "work-complete");
        assert_eq!(Cue::BreakComplete.id(), "break-complete");
        assert_ne!(Cue::WorkComplete.asset(), Cue::BreakComplete.asset());
    }

    #[test]
    fn asset_path_joins_sounds_dir() {
        let player = CommandCuePlayer::new("paplay", "/usr/share/sounds");
        assert_eq!(
            player.asset_path(Cue::BreakComplete),
            PathBuf::from("/usr/share/sounds/atomic.mp3")
        );
    }

    #[test]
    fn playing_outside_a_runtime_does_not_panic() {
        CommandCuePlayer::new("paplay", "sounds").play(Cue::WorkComplete);
    }

    #[tokio::test]
    async fn missing_program_is_absorbed() {
        let player = CommandCuePlayer::new("definitely-not-an-audio-player", "sounds");
        player.play(Cue::WorkComplete);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
}
