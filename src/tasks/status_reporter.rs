//! Status reporter background task

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Background task that logs what a display of the timer would show
pub async fn status_reporter_task(state: Arc<AppState>) {
    info!("Starting status reporter task");

    let mut updates = state.timer_update_tx.subscribe();
    let mut last = updates.borrow_and_update().clone();
    info!("Timer ready: {} mode, {}", last.mode, last.display());

    loop {
        if let Err(e) = updates.changed().await {
            warn!("Timer update channel closed: {}", e);
            break;
        }

        let current = updates.borrow_and_update().clone();

        if current.mode != last.mode {
            info!("Mode changed: {} -> {} ({})", last.mode, current.mode, current.display());
        } else if current.running != last.running {
            info!(
                "Timer {} at {}",
                if current.running { "running" } else { "stopped" },
                current.display()
            );
        } else {
            debug!("{} {}", current.mode, current.display());
        }

        last = current;
    }
}
