//! Rescan scheduling
//!
//! Content and configuration changes request scans through a two-state
//! scheduler that enforces a minimum period between scans. A burst of
//! requests inside the cooldown collapses into a single deferred scan.

use std::time::{Duration, Instant};

/// Source of the current time, injectable so tests need no real timers
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Clock backed by the monotonic system clock
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Outcome of a scan request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDecision {
    /// The cooldown has elapsed; run the scan immediately
    RunNow,
    /// First request inside the cooldown; a scan is now pending at the instant
    Deferred(Instant),
    /// A deferred scan is already outstanding; this request rides along
    AlreadyPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Pending { due: Instant },
}

/// Two-state cooldown scheduler: idle, or holding one deferred scan
#[derive(Debug)]
pub struct RescanScheduler {
    cooldown: Duration,
    last_completed: Option<Instant>,
    state: State,
}

impl RescanScheduler {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_completed: None,
            state: State::Idle,
        }
    }

    pub fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending { .. })
    }

    /// Ask for a scan at `now`
    pub fn request(&mut self, now: Instant) -> ScanDecision {
        if let State::Pending { .. } = self.state {
            return ScanDecision::AlreadyPending;
        }
        match self.last_completed {
            Some(last) if now.duration_since(last) < self.cooldown => {
                let due = last + self.cooldown;
                self.state = State::Pending { due };
                ScanDecision::Deferred(due)
            }
            _ => ScanDecision::RunNow,
        }
    }

    /// Claim a pending scan whose due time has arrived.
    ///
    /// Returns true at most once per deferral.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if let State::Pending { due } = self.state {
            if now >= due {
                self.state = State::Idle;
                return true;
            }
        }
        false
    }

    /// Record a completed scan
    pub fn completed(&mut self, now: Instant) {
        self.last_completed = Some(now);
    }

    /// Drop any pending deferral
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }
}
