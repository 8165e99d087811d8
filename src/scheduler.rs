use chrono::{DateTime, Utc};

/// A one-shot continuation armed under a given session generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeout<T> {
    pub due: DateTime<Utc>,
    pub generation: u64,
    pub step: T,
}

/// Cooperative single-threaded scheduler: a per-frame callback flag plus a
/// list of one-shot timeouts. Nothing runs on its own; the owner pumps it
/// once per frame.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    frame_requested: bool,
    timeouts: Vec<Timeout<T>>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            frame_requested: false,
            timeouts: Vec::new(),
        }
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_frame(&mut self) {
        self.frame_requested = true;
    }

    pub fn cancel_frame(&mut self) {
        self.frame_requested = false;
    }

    /// Consumes the frame request. The callback must re-arm itself to keep
    /// receiving frames.
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    pub fn set_timeout(&mut self, due: DateTime<Utc>, generation: u64, step: T) {
        self.timeouts.push(Timeout {
            due,
            generation,
            step,
        });
    }

    /// Removes and returns every timeout due at `now`, earliest first.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<Timeout<T>> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.timeouts.drain(..).partition(|t| t.due <= now);
        self.timeouts = pending;
        due.sort_by_key(|t| t.due);
        due
    }

    pub fn cancel_all(&mut self) {
        self.frame_requested = false;
        self.timeouts.clear();
    }
}
