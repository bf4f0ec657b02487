//! Countdown driver background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{state::AppState, tasks::scheduler::TimerSignal};

/// Background task that delivers scheduled callbacks to the pomodoro, one at a time
pub async fn countdown_driver_task(
    state: Arc<AppState>,
    mut signals: mpsc::UnboundedReceiver<TimerSignal>,
) {
    info!("Starting countdown driver task");

    while let Some(signal) = signals.recv().await {
        match state.dispatch(signal) {
            Ok(Some(transition)) => {
                debug!("Signal {:?} produced {:?}", signal, transition);
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to dispatch timer signal: {}", e);
            }
        }
    }
}
