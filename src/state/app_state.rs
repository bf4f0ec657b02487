//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::info;

use super::{
    pomodoro::{Pomodoro, Transition},
    settings::{Mode, PomodoroSettings},
    TimerState,
};
use crate::{
    services::cue::CuePlayer,
    tasks::scheduler::{TimerSignal, TokioScheduler},
    utils::clock::MonotonicClock,
};

/// Cue player shared with the running service
pub type SharedCuePlayer = Box<dyn CuePlayer + Send + Sync>;

/// The orchestrator as wired up for the running service
pub type ServicePomodoro = Pomodoro<MonotonicClock, TokioScheduler, SharedCuePlayer>;

/// Main application state that owns the pomodoro cycle
pub struct AppState {
    /// The single work/break cycle; the lock keeps handlers strictly one at a time
    pub pomodoro: Arc<Mutex<ServicePomodoro>>,
    pub settings: PomodoroSettings,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
}

impl AppState {
    /// Create the application state and the receiver its scheduled callbacks arrive on
    pub fn new(
        port: u16,
        host: String,
        settings: PomodoroSettings,
        frame_interval: Duration,
        cues: SharedCuePlayer,
    ) -> (Self, mpsc::UnboundedReceiver<TimerSignal>) {
        let (scheduler, signals) = TokioScheduler::new(frame_interval);
        let pomodoro = Pomodoro::new(settings, MonotonicClock::new(), scheduler, cues);
        let (timer_update_tx, timer_update_rx) = watch::channel(pomodoro.snapshot());

        let state = Self {
            pomodoro: Arc::new(Mutex::new(pomodoro)),
            settings,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        };
        (state, signals)
    }

    /// Apply a user action to the pomodoro and publish the resulting snapshot
    pub fn update_pomodoro<F, T>(&self, action: &str, updater: F) -> Result<TimerState, String>
    where
        F: FnOnce(&mut ServicePomodoro) -> T,
    {
        let snapshot = {
            let mut pomodoro = self.pomodoro.lock()
                .map_err(|e| format!("Failed to lock pomodoro: {}", e))?;
            updater(&mut *pomodoro);
            pomodoro.snapshot()
        };

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    pub fn start(&self) -> Result<TimerState, String> {
        info!("Start requested");
        self.update_pomodoro("start", |p| {
            if let Some(transition) = p.start() {
                log_transition(transition);
            }
        })
    }

    pub fn pause(&self) -> Result<TimerState, String> {
        info!("Pause requested");
        self.update_pomodoro("pause", |p| {
            if let Some(transition) = p.pause() {
                log_transition(transition);
            }
        })
    }

    pub fn stop(&self) -> Result<TimerState, String> {
        info!("Stop requested");
        self.update_pomodoro("stop", |p| p.stop())
    }

    /// Reset to the named mode; unknown names degrade to work
    pub fn reset(&self, mode: Option<&str>) -> Result<(TimerState, Mode), String> {
        info!("Reset requested (mode: {})", mode.unwrap_or("work"));
        let mut applied = Mode::Work;
        let snapshot = self.update_pomodoro("reset", |p| applied = p.reset_named(mode))?;
        Ok((snapshot, applied))
    }

    /// Deliver a scheduled callback to the pomodoro
    pub fn dispatch(&self, signal: TimerSignal) -> Result<Option<Transition>, String> {
        let (transition, snapshot) = {
            let mut pomodoro = self.pomodoro.lock()
                .map_err(|e| format!("Failed to lock pomodoro: {}", e))?;
            let transition = pomodoro.handle_signal(signal);
            (transition, pomodoro.snapshot())
        };

        if let Some(transition) = transition {
            log_transition(transition);
        }
        self.publish(snapshot);
        Ok(transition)
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.pomodoro.lock()
            .map(|pomodoro| pomodoro.snapshot())
            .map_err(|e| format!("Failed to lock pomodoro: {}", e))
    }

    /// Release every scheduled callback
    pub fn teardown(&self) -> Result<(), String> {
        let mut pomodoro = self.pomodoro.lock()
            .map_err(|e| format!("Failed to lock pomodoro: {}", e))?;
        pomodoro.teardown();
        info!("Pomodoro torn down");
        Ok(())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Notify snapshot watchers, skipping frames that changed nothing visible
    fn publish(&self, snapshot: TimerState) {
        self.timer_update_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

fn log_transition(transition: Transition) {
    match transition {
        Transition::WorkCompleted => info!("Work session completed, break started"),
        Transition::BreakCompleted => info!("Break completed, ready for the next work session"),
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("settings", &self.settings)
            .field("port", &self.port)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cue::SilentCuePlayer;

    fn app_state(settings: PomodoroSettings) -> (AppState, mpsc::UnboundedReceiver<TimerSignal>) {
        AppState::new(
            20554,
            "127.0.0.1".to_string(),
            settings,
            Duration::from_millis(5),
            Box::new(SilentCuePlayer),
        )
    }

    #[test]
    fn initial_snapshot_is_published() {
        let (state, _signals) = app_state(PomodoroSettings::default());
        let snapshot = state.timer_update_tx.borrow().clone();
        assert_eq!(snapshot.display(), "50:00");
        assert_eq!(snapshot.mode, Mode::Work);
    }

    #[test]
    fn reset_tracks_last_action_and_degrades_invalid_mode() {
        let (state, _signals) = app_state(PomodoroSettings::default());
        let (snapshot, applied) = state.reset(Some("lunch")).unwrap();

        assert_eq!(applied, Mode::Work);
        assert_eq!(snapshot.mode, Mode::Work);
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("reset"));
        assert!(time.is_some());
    }

    #[test]
    fn reset_to_break_publishes_break_snapshot() {
        let (state, _signals) = app_state(PomodoroSettings::default());
        let mut rx = state.timer_update_tx.subscribe();
        state.reset(Some("break")).unwrap();

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.mode, Mode::Break);
        assert_eq!(snapshot.display(), "10:00");
    }

    #[tokio::test]
    async fn break_countdown_consumes_frames_until_stopped() {
        let settings = PomodoroSettings {
            work_duration_ms: 0,
            break_duration_ms: 60_000,
        };
        let (state, mut signals) = app_state(settings);

        // A zero-length work session completes on start and the break runs on its own.
        let running = state.start().unwrap();
        assert!(running.running);
        assert_eq!(running.mode, Mode::Break);
        assert_eq!(running.display(), "01:00");

        let signal = signals.recv().await.expect("frame signal");
        assert_eq!(state.dispatch(signal).unwrap(), None);

        state.stop().unwrap();
        assert!(!state.get_timer_state().unwrap().running);
    }

    #[tokio::test]
    async fn short_break_completes_back_to_idle_work() {
        let settings = PomodoroSettings {
            work_duration_ms: 60_000,
            break_duration_ms: 1_000,
        };
        let (state, mut signals) = app_state(settings);
        state.reset(Some("break")).unwrap();
        state.start().unwrap();

        let transition = tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(signal) = signals.recv().await {
                if let Some(transition) = state.dispatch(signal).unwrap() {
                    return Some(transition);
                }
            }
            None
        })
        .await
        .expect("break should complete");

        assert_eq!(transition, Some(Transition::BreakCompleted));
        let snapshot = state.get_timer_state().unwrap();
        assert_eq!(snapshot.mode, Mode::Work);
        assert!(!snapshot.running);
        assert_eq!(snapshot.display(), "01:00");
    }

    #[tokio::test]
    async fn teardown_stops_the_running_countdown() {
        let (state, _signals) = app_state(PomodoroSettings::default());
        state.start().unwrap();
        state.teardown().unwrap();
        assert!(!state.get_timer_state().unwrap().running);
    }
}
