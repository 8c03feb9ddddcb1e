//! Minimum interval between fetches.

use chrono::{Duration, NaiveDateTime};

/// Refuses to let an action run again until an interval has elapsed.
///
/// The caller supplies the current time, so the limiter holds no clock.
/// If the clock moves backwards past the last run, the limiter lets the
/// next call through rather than blocking until the clock catches up.
#[derive(Debug, Clone)]
pub struct MinInterval {
    interval: Duration,
    last: Option<NaiveDateTime>,
}

impl MinInterval {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the last permitted call happened.
    pub fn last(&self) -> Option<NaiveDateTime> {
        self.last
    }

    /// Whether a call at `now` would be permitted.
    pub fn is_ready(&self, now: NaiveDateTime) -> bool {
        match self.last {
            None => true,
            Some(last) => {
                let elapsed = now.signed_duration_since(last);
                elapsed < Duration::zero() || elapsed >= self.interval
            }
        }
    }

    /// Record a call at `now` if permitted. Returns whether it was.
    pub fn try_acquire(&mut self, now: NaiveDateTime) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last = Some(now);
        true
    }

    /// Time left before the next call is permitted.
    pub fn remaining(&self, now: NaiveDateTime) -> Duration {
        match self.last {
            Some(last) if !self.is_ready(now) => self.interval - now.signed_duration_since(last),
            _ => Duration::zero(),
        }
    }
}
