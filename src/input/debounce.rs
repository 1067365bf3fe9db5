use embassy_time::{Duration, Instant};

use crate::gate::elapsed;

/// Default time a raw level must hold before it is accepted
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(50);

/// Debounced level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Line settled low (button pressed, active-low wiring)
    Pressed,
    /// Line settled high
    Released,
}

/// Debounce filter for one digital line
///
/// Any change of the raw level restarts the stability timer. The debounced
/// level follows only once the raw level has been stable for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    raw_high: bool,
    stable_high: bool,
    last_change: Instant,
    delay: Duration,
}

impl Debouncer {
    /// Create a filter that starts released (high)
    pub const fn new(delay: Duration, now: Instant) -> Self {
        Self {
            raw_high: true,
            stable_high: true,
            last_change: now,
            delay,
        }
    }

    /// Feed the current raw level
    ///
    /// Returns the debounced edge committed in this call, if any.
    pub fn update(&mut self, now: Instant, raw_high: bool) -> Option<Edge> {
        if raw_high != self.raw_high {
            self.raw_high = raw_high;
            self.last_change = now;
        }

        if self.raw_high == self.stable_high || elapsed(now, self.last_change) < self.delay {
            return None;
        }

        self.stable_high = self.raw_high;
        Some(if self.stable_high {
            Edge::Released
        } else {
            Edge::Pressed
        })
    }

    /// Debounced level
    pub const fn is_high(&self) -> bool {
        self.stable_high
    }

    /// Last raw sample
    pub const fn raw_is_high(&self) -> bool {
        self.raw_high
    }
}
