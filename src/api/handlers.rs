//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::error;

use crate::state::AppState;
use super::responses::{reset_message, ApiResponse, HealthResponse, ResetRequest, StatusResponse};

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok(timer) => Ok(Json(ApiResponse::from_timer(
            format!("{} countdown started", timer.mode),
            timer,
        ))),
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Freeze the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.pause() {
        Ok(timer) => Ok(Json(ApiResponse::from_timer(
            "Countdown paused".to_string(),
            timer,
        ))),
        Err(e) => {
            error!("Failed to pause countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - Reset the countdown to the full duration of the current mode
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop() {
        Ok(timer) => Ok(Json(ApiResponse::from_timer(
            "Countdown stopped".to_string(),
            timer,
        ))),
        Err(e) => {
            error!("Failed to stop countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Switch mode and reset; an unknown mode falls back to work
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ResetRequest>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    match state.reset(request.mode.as_deref()) {
        Ok((timer, mode)) => Ok(Json(ApiResponse::from_timer(reset_message(mode), timer))),
        Err(e) => {
            error!("Failed to reset pomodoro: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        work_duration_ms: state.settings.work_duration_ms,
        break_duration_ms: state.settings.break_duration_ms,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
