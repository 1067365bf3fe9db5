//! White wave chasing along the strip
//!
//! The wave center is a fractional pixel position. It moves a fixed distance
//! per step interval and wraps around the active length; pixels fade out
//! linearly with their circular distance from the center.

use embassy_time::{Duration, Instant};
use libm::{fabsf, fmodf, roundf};

use super::Pattern;
use crate::color::{Rgb, white};
use crate::context::StripState;

pub const CHASE_STEP_INTERVAL: Duration = Duration::from_millis(2);
pub const CHASE_STEP_INCREMENT: f32 = 0.1;
pub const CHASE_FADE_RATE: f32 = 100.0;

/// Steps replayed after a stall; anything older is dropped
const MAX_CATCH_UP_STEPS: u64 = 64;

#[derive(Debug, Clone)]
pub struct ChasePattern {
    position: f32,
    last_step: Option<Instant>,
    step_interval: Duration,
    increment: f32,
    fade_rate: f32,
}

impl Default for ChasePattern {
    fn default() -> Self {
        Self {
            position: 0.0,
            last_step: None,
            step_interval: CHASE_STEP_INTERVAL,
            increment: CHASE_STEP_INCREMENT,
            fade_rate: CHASE_FADE_RATE,
        }
    }
}

impl ChasePattern {
    /// Set how steeply brightness falls off per pixel of distance
    #[must_use]
    pub fn with_fade_rate(mut self, fade_rate: f32) -> Self {
        self.fade_rate = fade_rate;
        self
    }

    /// Current wave center in pixels
    pub const fn position(&self) -> f32 {
        self.position
    }

    /// Brightness of pixel `index` on a strip of `count` pixels
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn level_at(&self, index: usize, count: usize) -> u8 {
        let count = count as f32;
        let direct = fabsf(index as f32 - self.position);
        let distance = direct.min(count - direct);
        let level = roundf(255.0 - self.fade_rate * distance);
        level.clamp(0.0, 255.0) as u8
    }

    /// Apply every step interval elapsed since the last step
    ///
    /// Returns `true` if the wave moved.
    #[allow(clippy::cast_precision_loss)]
    fn catch_up(&mut self, now: Instant, count: f32) -> bool {
        let Some(last) = self.last_step else {
            self.last_step = Some(now);
            return true;
        };
        let interval = self.step_interval.as_ticks().max(1);
        let steps = now.as_ticks().saturating_sub(last.as_ticks()) / interval;
        if steps == 0 {
            return false;
        }

        if steps > MAX_CATCH_UP_STEPS {
            self.advance_position(MAX_CATCH_UP_STEPS as f32, count);
            self.last_step = Some(now);
        } else {
            self.advance_position(steps as f32, count);
            self.last_step = Some(Instant::from_ticks(last.as_ticks() + steps * interval));
        }
        true
    }

    fn advance_position(&mut self, steps: f32, count: f32) {
        self.position = fmodf(self.position + steps * self.increment, count);
    }
}

impl Pattern for ChasePattern {
    #[allow(clippy::cast_precision_loss)]
    fn advance(&mut self, now: Instant, _strip: &mut StripState, leds: &mut [Rgb]) -> bool {
        let count = leds.len();
        if count == 0 {
            return false;
        }
        // The active length may have shrunk under the wave
        self.position = fmodf(self.position, count as f32);
        let moved = self.catch_up(now, count as f32);

        for (index, led) in leds.iter_mut().enumerate() {
            *led = white(self.level_at(index, count));
        }
        moved
    }

    fn reset(&mut self) {
        self.position = 0.0;
        self.last_step = None;
    }
}
