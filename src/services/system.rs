//! Host capability checks

use tokio::process::Command;
use tracing::info;

/// Check that the audio program used for cues can be executed
pub async fn check_cue_program_available(program: &str) -> Result<(), String> {
    Command::new(program)
        .arg("--version")
        .output()
        .await
        .map_err(|e| format!("{} is not available for cue playback: {}", program, e))?;

    info!("{} is available for cue playback", program);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_is_reported() {
        let result = check_cue_program_available("definitely-not-an-audio-player").await;
        assert!(result.unwrap_err().contains("definitely-not-an-audio-player"));
    }
}
