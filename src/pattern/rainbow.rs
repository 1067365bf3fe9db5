//! Scrolling rainbow
//!
//! The phase lives in [`StripState`] and moves by a fixed step every cycle,
//! so the scroll speed follows the loop rate.

use embassy_time::Instant;

use super::Pattern;
use crate::color::{Rgb, fill_rainbow};
use crate::context::StripState;

/// Hue distance between neighbouring pixels
pub const RAINBOW_HUE_STEP: u8 = 7;
/// Phase increment per cycle
pub const RAINBOW_PHASE_STEP: u8 = 1;

#[derive(Debug, Clone)]
pub struct RainbowPattern {
    hue_step: u8,
    phase_step: u8,
    saturation: u8,
    value: u8,
}

impl Default for RainbowPattern {
    fn default() -> Self {
        Self {
            hue_step: RAINBOW_HUE_STEP,
            phase_step: RAINBOW_PHASE_STEP,
            saturation: 255,
            value: 255,
        }
    }
}

impl RainbowPattern {
    /// Set the per-cycle phase increment
    #[must_use]
    pub fn with_phase_step(mut self, phase_step: u8) -> Self {
        self.phase_step = phase_step;
        self
    }
}

impl Pattern for RainbowPattern {
    fn advance(&mut self, _now: Instant, strip: &mut StripState, leds: &mut [Rgb]) -> bool {
        strip.animation_phase = strip.animation_phase.wrapping_add(self.phase_step);
        fill_rainbow(
            leds,
            strip.animation_phase,
            self.hue_step,
            self.saturation,
            self.value,
        );
        true
    }
}
