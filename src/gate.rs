//! Elapsed-time gating
//!
//! Every timed behavior in the loop (debounce, idle timeout, sensor polling,
//! pattern stepping) is "time since a recorded instant is at least some
//! threshold". Nothing here waits; callers re-check on the next cycle.

use embassy_time::{Duration, Instant};

/// Time elapsed from `since` to `now`, zero if `now` is earlier
#[inline]
pub fn elapsed(now: Instant, since: Instant) -> Duration {
    Duration::from_millis(now.as_millis().saturating_sub(since.as_millis()))
}

/// Opens at most once per `interval`
///
/// The first call to [`IntervalGate::ready`] after construction or
/// [`IntervalGate::restart`] measures from the recorded instant.
#[derive(Debug, Clone, Copy)]
pub struct IntervalGate {
    interval: Duration,
    last: Instant,
}

impl IntervalGate {
    pub const fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last: now,
        }
    }

    /// Record `now` as the start of a new interval
    pub fn restart(&mut self, now: Instant) {
        self.last = now;
    }

    /// Returns `true` and restarts the interval if it has fully elapsed
    pub fn ready(&mut self, now: Instant) -> bool {
        if elapsed(now, self.last) >= self.interval {
            self.last = now;
            return true;
        }
        false
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }
}
