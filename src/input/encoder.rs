//! Rotary encoder counting
//!
//! Both counting strategies, the software [`QuadratureDecoder`] and a
//! hardware pulse counter updated outside the loop, sit behind
//! [`EncoderSource`]. [`EncoderReader`] turns the running count into
//! per-cycle deltas with one fixed sign convention.
//!
//! [`QuadratureDecoder`]: super::QuadratureDecoder

use core::cell::Cell;

use critical_section::Mutex;

/// Running encoder count
pub trait EncoderSource {
    /// Current count. Only differences between calls matter.
    fn count(&mut self) -> i32;
}

/// Which rotation produces positive deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderDirection {
    /// Clockwise increases
    Normal,
    /// Clockwise decreases (source counts the other way round)
    Inverted,
}

impl EncoderDirection {
    pub const fn sign(self) -> i32 {
        match self {
            Self::Normal => 1,
            Self::Inverted => -1,
        }
    }
}

/// Sign convention of the board's encoder wiring
///
/// Boards whose pulse counter counts down on clockwise rotation configure
/// [`EncoderDirection::Inverted`] instead.
pub const DEFAULT_ENCODER_DIRECTION: EncoderDirection = EncoderDirection::Normal;

/// Counter maintained outside the loop (pulse-count peripheral or interrupt)
///
/// Writers call [`SharedEncoderCounter::add`]; the loop only reads. Every read
/// is one consistent snapshot.
pub struct SharedEncoderCounter {
    count: Mutex<Cell<i32>>,
}

impl SharedEncoderCounter {
    pub const fn new() -> Self {
        Self {
            count: Mutex::new(Cell::new(0)),
        }
    }

    /// Add `steps` to the count. Safe to call from interrupt context.
    pub fn add(&self, steps: i32) {
        critical_section::with(|cs| {
            let cell = self.count.borrow(cs);
            cell.set(cell.get().wrapping_add(steps));
        });
    }

    /// Overwrite the count, e.g. when mirroring a hardware counter register
    pub fn store(&self, count: i32) {
        critical_section::with(|cs| self.count.borrow(cs).set(count));
    }

    pub fn snapshot(&self) -> i32 {
        critical_section::with(|cs| self.count.borrow(cs).get())
    }
}

impl Default for SharedEncoderCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderSource for &SharedEncoderCounter {
    fn count(&mut self) -> i32 {
        self.snapshot()
    }
}

/// Per-cycle delta extraction
///
/// Counts that do not add up to a whole step stay pending for the next
/// cycle, so the total number of steps never depends on how the rotation
/// was split across cycles.
pub struct EncoderReader<E: EncoderSource> {
    source: E,
    direction: EncoderDirection,
    counts_per_step: i32,
    previous: i32,
}

impl<E: EncoderSource> EncoderReader<E> {
    pub fn new(mut source: E, direction: EncoderDirection, counts_per_step: i32) -> Self {
        let previous = source.count();
        Self {
            source,
            direction,
            counts_per_step: counts_per_step.max(1),
            previous,
        }
    }

    /// Steps since the previous call
    pub fn delta(&mut self) -> i32 {
        let count = self.source.count();
        let sign = self.direction.sign();
        let raw = count.wrapping_sub(self.previous).wrapping_mul(sign);
        let steps = raw / self.counts_per_step;
        let consumed = steps.wrapping_mul(self.counts_per_step).wrapping_mul(sign);
        self.previous = self.previous.wrapping_add(consumed);
        steps
    }
}
