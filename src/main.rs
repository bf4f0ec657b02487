//! Pomodoro Timer - A drift-resistant work/break countdown service
//! 
//! This is the main entry point for the pomodoro-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use pomodoro_timer::{
    config::Config,
    state::{app_state::SharedCuePlayer, AppState},
    api::create_router,
    services::{check_cue_program_available, CommandCuePlayer, SilentCuePlayer},
    tasks::{countdown_driver_task, status_reporter_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_timer={},tower_http=info", config.log_level()))
        .init();

    let settings = config.settings();
    info!("Starting pomodoro-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, work={}ms, break={}ms, frame={}ms",
          config.host, config.port, settings.work_duration_ms,
          settings.break_duration_ms, config.frame_ms);

    // Cue playback is best-effort; fall back to logging if the audio program is missing
    let cues: SharedCuePlayer = if config.mute {
        Box::new(SilentCuePlayer)
    } else if let Err(e) = check_cue_program_available(&config.cue_program).await {
        warn!("{}, cues will only be logged", e);
        Box::new(SilentCuePlayer)
    } else {
        Box::new(CommandCuePlayer::new(config.cue_program.clone(), config.sounds_dir.clone()))
    };

    // Create application state
    let (state, signals) = AppState::new(
        config.port,
        config.host.clone(),
        settings,
        config.frame_interval(),
        cues,
    );
    let state = Arc::new(state);

    // Deliver scheduled countdown callbacks
    tokio::spawn(countdown_driver_task(Arc::clone(&state), signals));
    tokio::spawn(status_reporter_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start  - Start or resume the countdown");
    info!("  POST /pause  - Pause the countdown");
    info!("  POST /stop   - Reset the countdown for the current mode");
    info!("  POST /reset  - Switch mode ({{\"mode\": \"work\"|\"break\"}}) and reset");
    info!("  GET  /status - Current mode and remaining time");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(_) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("{}", e),
            }
        }
    }

    if let Err(e) = state.teardown() {
        warn!("Failed to tear down pomodoro: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
