use crate::clock::{Clock, SystemClock};
use crate::expander::IntervalExpander;
use crate::models::{Playlist, Segment};
use crate::scheduler::FrameScheduler;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

/// Fixed delays used around segment changes and resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineTiming {
    /// Beat between leaving a segment and dequeuing the next one.
    pub settle: Duration,
    /// "Get ready" pause before the next countdown is armed.
    pub ready: Duration,
    /// Added to the deadline on resume to absorb frame latency.
    pub resume_offset: Duration,
}

impl Default for EngineTiming {
    fn default() -> Self {
        Self {
            settle: Duration::milliseconds(500),
            ready: Duration::milliseconds(1000),
            resume_offset: Duration::milliseconds(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Transitioning,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub current: Option<Segment>,
    pub remaining_secs: u64,
    pub is_running: bool,
    pub is_transitioning: bool,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum TransitionStep {
    Dequeue { resume: bool },
    Enter { segment: Segment, resume: bool },
}

/// Countdown state machine over an expanded playlist.
///
/// Remaining time is always derived from an absolute deadline, never
/// decremented, so any number of pause/resume cycles cannot drift. The
/// engine does nothing by itself: the owner calls [`TimerEngine::tick`]
/// once per frame, which fires due transition steps and re-polls the
/// deadline while running.
pub struct TimerEngine<C: Clock = SystemClock> {
    clock: C,
    timing: EngineTiming,
    expander: IntervalExpander,
    scheduler: FrameScheduler<TransitionStep>,
    current: Option<Segment>,
    deadline: Option<DateTime<Utc>>,
    remaining_secs: u64,
    running: bool,
    transitioning: bool,
    // Next segment already dequeued, waiting for the ready delay.
    staged: bool,
    completed: bool,
    // Bumped on every reset; continuations armed under an older value are stale.
    generation: u64,
}

impl TimerEngine<SystemClock> {
    pub fn new(playlist: Playlist, timing: EngineTiming) -> Self {
        Self::with_clock(playlist, timing, SystemClock)
    }
}

impl<C: Clock> TimerEngine<C> {
    pub fn with_clock(playlist: Playlist, timing: EngineTiming, clock: C) -> Self {
        let expander = IntervalExpander::new(playlist);
        let current = expander.current().cloned();
        let remaining_secs = current.as_ref().map_or(0, |s| s.duration);
        let completed = current.is_none();

        debug!(
            playlist = %expander.playlist().id,
            segments = expander.len(),
            "timer engine created"
        );
        if completed {
            info!(playlist = %expander.playlist().id, "playlist is empty, session completed");
        }

        Self {
            clock,
            timing,
            expander,
            scheduler: FrameScheduler::new(),
            current,
            deadline: None,
            remaining_secs,
            running: false,
            transitioning: false,
            staged: false,
            completed,
            generation: 0,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        self.expander.playlist()
    }

    pub fn current(&self) -> Option<&Segment> {
        self.current.as_ref()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn status(&self) -> TimerStatus {
        if self.completed {
            TimerStatus::Completed
        } else if self.transitioning {
            TimerStatus::Transitioning
        } else if self.running {
            TimerStatus::Running
        } else if self.deadline.is_some() {
            TimerStatus::Paused
        } else {
            TimerStatus::Idle
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            status: self.status(),
            current: self.current.clone(),
            remaining_secs: self.remaining_secs,
            is_running: self.running,
            is_transitioning: self.transitioning,
            is_completed: self.completed,
        }
    }

    /// Segments queued after the one on screen.
    pub fn upcoming(&self) -> impl Iterator<Item = &Segment> {
        let skip = usize::from(self.current.is_some() && !self.staged);
        self.expander.upcoming().skip(skip)
    }

    /// Toggles between running and paused. Rejected while a segment change
    /// is in flight, or when there is nothing to play.
    pub fn start_or_pause(&mut self) -> bool {
        if self.transitioning {
            debug!("start/pause ignored during transition");
            return false;
        }

        let now = self.clock.now();

        if self.running {
            self.remaining_secs = self.remaining_at(now);
            self.running = false;
            self.scheduler.cancel_frame();
            debug!(remaining = self.remaining_secs, "paused");
            return true;
        }

        if self.completed {
            // The queue was already rebuilt when the session finished.
            self.current = self.expander.current().cloned();
            self.deadline = None;
            if self.current.is_some() {
                self.completed = false;
                debug!("restarting completed session");
            }
        }

        let Some(segment) = self.current.as_ref() else {
            return false;
        };

        match self.deadline {
            None => {
                self.remaining_secs = segment.duration;
                self.deadline = Some(deadline_after(now, segment.duration, Duration::zero()));
                debug!(segment = %segment.name, duration = segment.duration, "started");
            }
            Some(_) => {
                self.deadline = Some(deadline_after(
                    now,
                    self.remaining_secs,
                    self.timing.resume_offset,
                ));
                debug!(segment = %segment.name, remaining = self.remaining_secs, "resumed");
            }
        }

        self.running = true;
        self.scheduler.request_frame();
        true
    }

    /// Leaves the current segment. The next one is entered after the settle
    /// and ready delays have passed; the countdown resumes only if it was
    /// running when this was called.
    pub fn advance(&mut self) -> bool {
        if self.transitioning || self.completed {
            debug!(
                transitioning = self.transitioning,
                completed = self.completed,
                "advance ignored"
            );
            return false;
        }

        let now = self.clock.now();
        let resume = self.running;
        self.transitioning = true;
        self.scheduler.cancel_frame();
        self.scheduler.set_timeout(
            now + self.timing.settle,
            self.generation,
            TransitionStep::Dequeue { resume },
        );
        debug!(
            from = self.current.as_ref().map(|s| s.name.as_str()),
            resume,
            "advancing"
        );
        true
    }

    /// Back to the first segment, idle. Legal from any state; cancels any
    /// pending frame or transition.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.scheduler.cancel_all();
        self.expander.reset();
        self.current = self.expander.current().cloned();
        self.deadline = None;
        self.remaining_secs = self.current.as_ref().map_or(0, |s| s.duration);
        self.running = false;
        self.transitioning = false;
        self.staged = false;
        self.completed = self.current.is_none();
        debug!(generation = self.generation, "reset");
    }

    /// Frame pump. Runs due transition steps, then polls the deadline if a
    /// frame was requested.
    pub fn tick(&mut self) {
        let now = self.clock.now();

        loop {
            let due = self.scheduler.take_due(now);
            if due.is_empty() {
                break;
            }
            for timeout in due {
                if timeout.generation != self.generation {
                    debug!(
                        armed = timeout.generation,
                        current = self.generation,
                        "dropping stale transition step"
                    );
                    continue;
                }
                self.run_step(timeout.step, timeout.due, now);
            }
        }

        if self.transitioning || !self.scheduler.take_frame() {
            return;
        }
        if !self.running {
            return;
        }

        self.remaining_secs = self.remaining_at(now);
        if self.remaining_secs == 0 {
            debug!(
                segment = self.current.as_ref().map(|s| s.name.as_str()),
                "segment expired"
            );
            self.advance();
        } else {
            self.scheduler.request_frame();
        }
    }

    fn run_step(&mut self, step: TransitionStep, due: DateTime<Utc>, now: DateTime<Utc>) {
        match step {
            TransitionStep::Dequeue { resume } => {
                self.expander.next();
                if !self.expander.has_next() {
                    self.finish();
                    return;
                }
                if let Some(segment) = self.expander.current().cloned() {
                    self.staged = true;
                    self.scheduler.set_timeout(
                        due + self.timing.ready,
                        self.generation,
                        TransitionStep::Enter { segment, resume },
                    );
                }
            }
            TransitionStep::Enter { segment, resume } => {
                self.remaining_secs = segment.duration;
                self.transitioning = false;
                self.staged = false;
                if resume {
                    self.deadline = Some(deadline_after(now, segment.duration, Duration::zero()));
                    self.running = true;
                    self.scheduler.request_frame();
                } else {
                    self.deadline = None;
                    self.running = false;
                }
                debug!(segment = %segment.name, duration = segment.duration, running = resume, "entered segment");
                self.current = Some(segment);
            }
        }
    }

    // Leaves the queue rebuilt and the remaining time on the first segment,
    // but keeps the completed flag up for the caller to observe.
    fn finish(&mut self) {
        self.reset();
        self.current = None;
        self.completed = true;
        info!(playlist = %self.expander.playlist().id, "session completed");
    }

    fn remaining_at(&self, now: DateTime<Utc>) -> u64 {
        match self.deadline {
            Some(deadline) => ((deadline - now).num_milliseconds().max(0) / 1000) as u64,
            None => self.remaining_secs,
        }
    }
}

/// `now + secs + extra`, saturating at the latest representable instant.
fn deadline_after(now: DateTime<Utc>, secs: u64, extra: Duration) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|d| d.checked_add(&extra))
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
