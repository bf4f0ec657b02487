//! Signal handling for graceful shutdown

use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::info;

/// Wait for a shutdown signal (SIGTERM, SIGINT) and return its number
pub async fn shutdown_signal() -> Result<i32, String> {
    let mut signals = Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ])
    .map_err(|e| format!("Failed to create signal handler: {}", e))?;

    let signal = signals
        .next()
        .await
        .ok_or_else(|| "Signal stream ended unexpectedly".to_string())?;
    info!("Received signal: {}", signal);
    signals.handle().close();
    Ok(signal)
}
