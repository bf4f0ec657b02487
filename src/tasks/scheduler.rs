//! Scheduling primitives consumed by the countdown engine
//!
//! The engine never sleeps or loops itself. It asks a [`Scheduler`] for a
//! repeating redraw signal and a one-shot fallback deadline, and receives both
//! back as [`TimerSignal`]s tagged with the segment that armed them.

use std::time::Duration;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval, sleep, MissedTickBehavior},
};
use tracing::debug;

/// What kind of scheduled callback fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// A redraw opportunity: recompute remaining time from the wall clock
    Frame,
    /// The one-shot fallback armed for exactly the remaining duration
    Deadline,
}

/// A scheduled callback delivered back to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSignal {
    pub segment: u64,
    pub wakeup: Wakeup,
}

impl TimerSignal {
    pub fn frame(segment: u64) -> Self {
        Self { segment, wakeup: Wakeup::Frame }
    }

    pub fn deadline(segment: u64) -> Self {
        Self { segment, wakeup: Wakeup::Deadline }
    }
}

/// A handle to a scheduled callback that can be cancelled any number of times
pub trait Cancel {
    fn cancel(&mut self);
}

/// Source of the two scheduling primitives the engine needs
pub trait Scheduler {
    type Handle: Cancel;

    /// Deliver `Wakeup::Frame` repeatedly until the handle is cancelled
    fn request_frames(&self, segment: u64) -> Self::Handle;

    /// Deliver `Wakeup::Deadline` once after `delay`
    fn wake_after(&self, delay: Duration, segment: u64) -> Self::Handle;
}

/// Scheduler backed by tokio tasks posting onto an unbounded channel
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TimerSignal>,
    frame_interval: Duration,
}

impl TokioScheduler {
    /// Create a scheduler and the receiving end its signals arrive on
    pub fn new(frame_interval: Duration) -> (Self, mpsc::UnboundedReceiver<TimerSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let frame_interval = frame_interval.max(Duration::from_millis(1));
        (Self { tx, frame_interval }, rx)
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TaskHandle;

    fn request_frames(&self, segment: u64) -> TaskHandle {
        let tx = self.tx.clone();
        let period = self.frame_interval;

        TaskHandle::new(tokio::spawn(async move {
            let mut frames = interval(period);
            frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                frames.tick().await;
                if tx.send(TimerSignal::frame(segment)).is_err() {
                    debug!("Signal receiver dropped, stopping frame loop for segment {}", segment);
                    break;
                }
            }
        }))
    }

    fn wake_after(&self, delay: Duration, segment: u64) -> TaskHandle {
        let tx = self.tx.clone();

        TaskHandle::new(tokio::spawn(async move {
            sleep(delay).await;
            if tx.send(TimerSignal::deadline(segment)).is_err() {
                debug!("Signal receiver dropped before deadline of segment {}", segment);
            }
        }))
    }
}

/// Owned handle to a spawned scheduling task; aborts the task on cancel or drop
#[derive(Debug)]
pub struct TaskHandle {
    task: Option<JoinHandle<()>>,
}

impl TaskHandle {
    fn new(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    pub fn is_cancelled(&self) -> bool {
        self.task.is_none()
    }
}

impl Cancel for TaskHandle {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test]
    async fn deadline_fires_once_with_its_segment() {
        let (scheduler, mut rx) = TokioScheduler::new(Duration::from_millis(10));
        let _handle = scheduler.wake_after(Duration::from_millis(5), 7);

        let signal = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("deadline should fire")
            .expect("channel open");
        assert_eq!(signal, TimerSignal::deadline(7));
    }

    #[tokio::test]
    async fn frames_repeat_until_cancelled() {
        let (scheduler, mut rx) = TokioScheduler::new(Duration::from_millis(5));
        let mut handle = scheduler.request_frames(3);

        for _ in 0..3 {
            let signal = timeout(Duration::from_secs(1), rx.recv())
                .await
                .expect("frame should fire")
                .expect("channel open");
            assert_eq!(signal, TimerSignal::frame(3));
        }

        handle.cancel();
        assert!(handle.is_cancelled());
        // Let the abort land, then drain anything queued before it.
        sleep(Duration::from_millis(20)).await;
        while rx.try_recv().is_ok() {}

        sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancelled_deadline_never_fires() {
        let (scheduler, mut rx) = TokioScheduler::new(Duration::from_millis(10));
        let mut handle = scheduler.wake_after(Duration::from_millis(20), 1);
        handle.cancel();
        handle.cancel();

        sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn frame_interval_is_never_zero() {
        let (scheduler, _rx) = TokioScheduler::new(Duration::ZERO);
        assert_eq!(scheduler.frame_interval(), Duration::from_millis(1));
    }
}
