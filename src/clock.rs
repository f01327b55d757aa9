//! Wall-clock timestamp sources.
//!
//! Every mutation stamps its records with the clock's current time in
//! milliseconds since the Unix epoch. Callers never supply timestamps.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Source of mutation timestamps.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> Timestamp;
}

/// System wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> Timestamp {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests and replays.
///
/// Each read returns the current value and then advances it by `step`
/// milliseconds. A step of zero gives a frozen clock.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
    step: i64,
}

impl ManualClock {
    /// Clock frozen at `at`.
    pub fn fixed(at: Timestamp) -> Self {
        Self::ticking(at, 0)
    }

    /// Clock starting at `start` that advances `step` ms per read.
    pub fn ticking(start: Timestamp, step: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
            step,
        }
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set(&self, at: Timestamp) {
        self.now.store(at, Ordering::SeqCst);
    }

    /// Current value without advancing.
    pub fn peek(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> Timestamp {
        self.now.fetch_add(self.step, Ordering::SeqCst)
    }
}
