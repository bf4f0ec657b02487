//! Deterministic clock and scheduler for unit tests

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use crate::{
    tasks::scheduler::{Cancel, Scheduler, TimerSignal, Wakeup},
    utils::clock::Clock,
};

/// Clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// One callback armed through the recording scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Armed {
    pub wakeup: Wakeup,
    pub segment: u64,
    pub delay: Option<Duration>,
    pub cancelled: bool,
}

impl Armed {
    pub fn signal(&self) -> TimerSignal {
        TimerSignal {
            segment: self.segment,
            wakeup: self.wakeup,
        }
    }
}

/// Scheduler that records what was armed and cancelled instead of running anything
#[derive(Debug, Clone, Default)]
pub struct RecordingScheduler {
    armed: Arc<Mutex<Vec<Armed>>>,
}

impl RecordingScheduler {
    pub fn armed(&self) -> Vec<Armed> {
        self.armed.lock().unwrap().clone()
    }

    pub fn live(&self) -> Vec<Armed> {
        self.armed().into_iter().filter(|a| !a.cancelled).collect()
    }

    /// Signal of the most recently armed, still live callback of the given kind
    pub fn live_signal(&self, wakeup: Wakeup) -> Option<TimerSignal> {
        self.live()
            .into_iter()
            .rev()
            .find(|a| a.wakeup == wakeup)
            .map(|a| a.signal())
    }

    fn arm(&self, wakeup: Wakeup, segment: u64, delay: Option<Duration>) -> RecordedHandle {
        let mut armed = self.armed.lock().unwrap();
        armed.push(Armed {
            wakeup,
            segment,
            delay,
            cancelled: false,
        });
        RecordedHandle {
            index: armed.len() - 1,
            armed: Arc::clone(&self.armed),
        }
    }
}

impl Scheduler for RecordingScheduler {
    type Handle = RecordedHandle;

    fn request_frames(&self, segment: u64) -> RecordedHandle {
        self.arm(Wakeup::Frame, segment, None)
    }

    fn wake_after(&self, delay: Duration, segment: u64) -> RecordedHandle {
        self.arm(Wakeup::Deadline, segment, Some(delay))
    }
}

#[derive(Debug)]
pub struct RecordedHandle {
    index: usize,
    armed: Arc<Mutex<Vec<Armed>>>,
}

impl Cancel for RecordedHandle {
    fn cancel(&mut self) {
        self.armed.lock().unwrap()[self.index].cancelled = true;
    }
}
