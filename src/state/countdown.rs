//! Countdown engine
//!
//! A single pausable countdown tracked against a wall clock. While running,
//! remaining time is always `remaining_at_segment_start - (now - segment_anchor)`;
//! nothing is ever decremented per tick.
//!
//! ## States
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//!                    |                  |
//!                    +--(reaches 0)--> Completed --start--> Running (full duration)
//!
//! any --stop--> Idle (full duration)
//! ```
//!
//! Every running segment arms two callbacks through the [`Scheduler`]: a
//! repeating frame signal and a one-shot deadline for exactly the remaining
//! time. Both are cancelled together on every exit from the running state.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    tasks::scheduler::{Cancel, Scheduler, TimerSignal, Wakeup},
    utils::clock::Clock,
};

/// Convert a duration in seconds from untrusted input into milliseconds.
///
/// Negative, NaN and infinite values become zero.
pub fn duration_ms_from_secs(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0).round() as u64
}

/// Split whole remaining seconds into zero-padded `(minutes, seconds)` display strings
pub fn format_remaining(remaining_seconds: u64) -> (String, String) {
    (
        format!("{:02}", remaining_seconds / 60),
        format!("{:02}", remaining_seconds % 60),
    )
}

/// The running interval between a `start()` and the next pause, stop or completion
#[derive(Debug, Clone, Copy)]
struct Segment {
    anchor_ms: u64,
    remaining_at_start: u64,
}

pub struct Countdown<C: Clock, S: Scheduler> {
    clock: C,
    scheduler: S,
    configured_ms: u64,
    /// Authoritative remaining time while idle; last flushed value while running.
    remaining_ms: u64,
    segment: Option<Segment>,
    /// Incremented on every start so stale signals can be told apart.
    segment_id: u64,
    just_stopped: bool,
    frames: Option<S::Handle>,
    deadline: Option<S::Handle>,
}

impl<C: Clock, S: Scheduler> Countdown<C, S> {
    pub fn new(duration_ms: u64, clock: C, scheduler: S) -> Self {
        Self {
            clock,
            scheduler,
            configured_ms: duration_ms,
            remaining_ms: duration_ms,
            segment: None,
            segment_id: 0,
            just_stopped: false,
            frames: None,
            deadline: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.segment.is_some()
    }

    /// True once the countdown has run out, until the next `start()`
    pub fn is_completed(&self) -> bool {
        !self.is_running() && self.remaining_ms == 0
    }

    pub fn configured_ms(&self) -> u64 {
        self.configured_ms
    }

    /// Remaining time, recomputed from the wall clock while running
    pub fn remaining_ms(&self) -> u64 {
        match self.segment {
            Some(segment) => self.compute_remaining(segment),
            None => self.remaining_ms,
        }
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_ms() / 1000
    }

    pub fn formatted_minutes(&self) -> String {
        format_remaining(self.remaining_seconds()).0
    }

    pub fn formatted_seconds(&self) -> String {
        format_remaining(self.remaining_seconds()).1
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) {
        if self.is_running() {
            debug!("Countdown already running, ignoring start");
            return;
        }

        if self.remaining_ms == 0 {
            self.remaining_ms = self.configured_ms;
        }
        if self.remaining_ms == 0 {
            warn!("Countdown has a zero duration, nothing to start");
            return;
        }

        self.just_stopped = false;
        self.segment_id += 1;
        self.segment = Some(Segment {
            anchor_ms: self.clock.now_ms(),
            remaining_at_start: self.remaining_ms,
        });
        self.arm();

        info!(
            "Countdown started (segment {}, {}ms remaining)",
            self.segment_id, self.remaining_ms
        );
    }

    /// Freeze the countdown at its current value.
    ///
    /// Returns true if the time had already run out, in which case the
    /// countdown completes instead of pausing.
    pub fn pause(&mut self) -> bool {
        let Some(segment) = self.segment else {
            return false;
        };

        let remaining = self.compute_remaining(segment);
        if remaining == 0 {
            self.complete();
            return true;
        }

        self.leave_running(remaining);
        self.just_stopped = false;
        info!("Countdown paused with {}ms remaining", remaining);
        false
    }

    /// Full reset to the configured duration
    pub fn stop(&mut self) {
        self.leave_running(self.configured_ms);
        self.just_stopped = true;
        debug!("Countdown stopped, reset to {}ms", self.configured_ms);
    }

    /// Adopt a new target duration.
    ///
    /// Idle countdowns that were just stopped, or that have not started
    /// counting down yet, take the new duration immediately. A running or
    /// part-way paused countdown keeps its remaining time until the next stop.
    pub fn set_duration_ms(&mut self, duration_ms: u64) {
        let previous = self.configured_ms;
        self.configured_ms = duration_ms;

        if self.is_running() {
            return;
        }

        if self.just_stopped {
            self.remaining_ms = duration_ms;
            self.just_stopped = false;
        } else if self.remaining_ms == previous && previous != duration_ms {
            self.remaining_ms = duration_ms;
        } else {
            return;
        }
        debug!("Countdown duration set to {}ms", duration_ms);
    }

    /// React to a scheduled callback. Returns true when this signal completed the countdown.
    pub fn handle_signal(&mut self, signal: TimerSignal) -> bool {
        let Some(segment) = self.segment else {
            return false;
        };
        if signal.segment != self.segment_id {
            debug!(
                "Ignoring stale {:?} from segment {} (current {})",
                signal.wakeup, signal.segment, self.segment_id
            );
            return false;
        }

        let remaining = match signal.wakeup {
            Wakeup::Frame => self.compute_remaining(segment),
            Wakeup::Deadline => 0,
        };

        if remaining == 0 {
            self.complete();
            true
        } else {
            self.remaining_ms = remaining;
            false
        }
    }

    /// Release every scheduled callback, freezing the current value
    pub fn teardown(&mut self) {
        if let Some(segment) = self.segment {
            let remaining = self.compute_remaining(segment);
            self.leave_running(remaining);
        }
        self.cancel_schedules();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn compute_remaining(&self, segment: Segment) -> u64 {
        let elapsed = self.clock.now_ms().saturating_sub(segment.anchor_ms);
        segment.remaining_at_start.saturating_sub(elapsed)
    }

    fn complete(&mut self) {
        self.leave_running(0);
        info!("Countdown completed (segment {})", self.segment_id);
    }

    fn leave_running(&mut self, remaining_ms: u64) {
        self.cancel_schedules();
        self.segment = None;
        self.remaining_ms = remaining_ms;
    }

    fn arm(&mut self) {
        self.cancel_schedules();
        self.frames = Some(self.scheduler.request_frames(self.segment_id));
        self.deadline = Some(
            self.scheduler
                .wake_after(Duration::from_millis(self.remaining_ms), self.segment_id),
        );
    }

    fn cancel_schedules(&mut self) {
        if let Some(mut frames) = self.frames.take() {
            frames.cancel();
        }
        if let Some(mut deadline) = self.deadline.take() {
            deadline.cancel();
        }
    }
}

impl<C: Clock, S: Scheduler> Drop for Countdown<C, S> {
    fn drop(&mut self) {
        self.cancel_schedules();
    }
}
