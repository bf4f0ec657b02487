//! Work/break cycle on top of a single countdown
//!
//! Work completes into an automatically started break. Break completes into
//! an idle work session that waits for the user.

use tracing::{info, warn};

use super::{
    countdown::{format_remaining, Countdown},
    settings::{Mode, PomodoroSettings},
    timer_state::TimerState,
};
use crate::{
    services::cue::{Cue, CuePlayer},
    tasks::scheduler::{Scheduler, TimerSignal},
    utils::clock::Clock,
};

/// A completed half of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    WorkCompleted,
    BreakCompleted,
}

pub struct Pomodoro<C: Clock, S: Scheduler, P: CuePlayer> {
    countdown: Countdown<C, S>,
    mode: Mode,
    settings: PomodoroSettings,
    /// Start the next countdown as soon as its duration has been applied.
    pending_auto_start: bool,
    cues: P,
}

impl<C: Clock, S: Scheduler, P: CuePlayer> Pomodoro<C, S, P> {
    pub fn new(settings: PomodoroSettings, clock: C, scheduler: S, cues: P) -> Self {
        let mode = Mode::Work;
        Self {
            countdown: Countdown::new(settings.duration_ms(mode), clock, scheduler),
            mode,
            settings,
            pending_auto_start: false,
            cues,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_work_mode(&self) -> bool {
        self.mode == Mode::Work
    }

    pub fn is_break_mode(&self) -> bool {
        self.mode == Mode::Break
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn countdown(&self) -> &Countdown<C, S> {
        &self.countdown
    }

    pub fn formatted_minutes(&self) -> String {
        self.countdown.formatted_minutes()
    }

    pub fn formatted_seconds(&self) -> String {
        self.countdown.formatted_seconds()
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn is_completed(&self) -> bool {
        self.countdown.is_completed()
    }

    pub fn snapshot(&self) -> TimerState {
        let remaining_seconds = self.countdown.remaining_seconds();
        let (formatted_minutes, formatted_seconds) = format_remaining(remaining_seconds);
        TimerState {
            mode: self.mode,
            is_work_mode: self.is_work_mode(),
            is_break_mode: self.is_break_mode(),
            formatted_minutes,
            formatted_seconds,
            remaining_seconds,
            running: self.is_running(),
            completed: self.is_completed(),
        }
    }

    // ── Controls ─────────────────────────────────────────────────────

    /// Start the countdown; a mode with nothing to count down completes straight away
    pub fn start(&mut self) -> Option<Transition> {
        self.countdown.start();
        if !self.countdown.is_running() && self.countdown.is_completed() {
            info!("{} mode has a zero duration, completing it", self.mode);
            return Some(self.on_completed());
        }
        None
    }

    /// Pause the countdown; if its time had already run out this completes the current mode instead
    pub fn pause(&mut self) -> Option<Transition> {
        if self.countdown.pause() {
            Some(self.on_completed())
        } else {
            None
        }
    }

    pub fn stop(&mut self) {
        self.countdown.stop();
    }

    /// Jump to `mode` with a fully reset, idle countdown. No cue is played.
    pub fn reset(&mut self, mode: Mode) {
        info!("Resetting pomodoro to {} mode", mode);
        self.mode = mode;
        self.countdown.stop();
        self.pending_auto_start = false;
        self.apply_mode_duration();
    }

    /// Reset by mode name; missing names mean work and unknown names fall back to work
    pub fn reset_named(&mut self, mode: Option<&str>) -> Mode {
        let mode = match mode.map(str::parse::<Mode>) {
            None => Mode::Work,
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                warn!("{}, defaulting to 'work'", e);
                Mode::Work
            }
        };
        self.reset(mode);
        mode
    }

    /// Feed a scheduled callback into the countdown and run any resulting transition
    pub fn handle_signal(&mut self, signal: TimerSignal) -> Option<Transition> {
        if self.countdown.handle_signal(signal) {
            Some(self.on_completed())
        } else {
            None
        }
    }

    pub fn teardown(&mut self) {
        self.countdown.teardown();
    }

    // ── Transitions ──────────────────────────────────────────────────

    fn on_completed(&mut self) -> Transition {
        match self.mode {
            Mode::Work => {
                info!("Work session complete, switching to break");
                self.cues.play(Cue::WorkComplete);
                self.countdown.stop();
                self.mode = Mode::Break;
                self.pending_auto_start = true;
                self.apply_mode_duration();
                Transition::WorkCompleted
            }
            Mode::Break => {
                info!("Break complete, switching to work");
                self.cues.play(Cue::BreakComplete);
                self.countdown.stop();
                self.mode = Mode::Work;
                self.apply_mode_duration();
                Transition::BreakCompleted
            }
        }
    }

    /// Keep the countdown's duration in line with the mode, then honour a pending auto-start
    fn apply_mode_duration(&mut self) {
        self.countdown.set_duration_ms(self.settings.duration_ms(self.mode));

        if self.pending_auto_start && self.mode == Mode::Break && !self.countdown.is_running() {
            self.pending_auto_start = false;
            self.countdown.start();
            // A zero-length break is over as soon as it starts. Break completion
            // never auto-starts, so this ends in an idle work session.
            if !self.countdown.is_running() && self.countdown.is_completed() {
                info!("Break has a zero duration, completing it");
                self.on_completed();
            }
        }
    }
}
