//! Pattern engine
//!
//! Advances the active pattern once per cycle, whatever the UI is doing, and
//! decides whether the resulting frame needs to go out on the wire.

use embassy_time::Instant;
use log::debug;

use crate::color::{BLACK, Rgb, fill_solid};
use crate::context::StripState;
use crate::pattern::{PatternId, PatternSlot};

pub struct PatternEngine<const MAX_LEDS: usize> {
    slot: PatternSlot,
    frame_buffer: [Rgb; MAX_LEDS],
    /// Pixels that may still be lit on the physical strip
    lit_len: usize,
    /// An all-black frame went out since the strip was switched off
    off_sent: bool,
    /// Transmit the next frame even if the pattern reports no change
    force_transmit: bool,
}

impl<const MAX_LEDS: usize> PatternEngine<MAX_LEDS> {
    pub fn new(pattern: PatternId) -> Self {
        Self {
            slot: pattern.to_slot(),
            frame_buffer: [BLACK; MAX_LEDS],
            lit_len: 0,
            off_sent: false,
            force_transmit: true,
        }
    }

    /// Switch to `pattern` with fresh sub-state
    ///
    /// This is the only path that clears pattern timers and counters;
    /// re-selecting the running pattern restarts it too.
    pub fn select(&mut self, pattern: PatternId, strip: &mut StripState) {
        debug!("pattern selected: {}", pattern.as_str());
        strip.active_pattern = pattern;
        self.slot = pattern.to_slot();
        self.slot.reset();
        self.force_transmit = true;
    }

    pub fn pattern(&self) -> &PatternSlot {
        &self.slot
    }

    /// Advance one cycle
    ///
    /// Returns the frame to transmit, or `None` when the strip already shows
    /// what it should.
    pub fn advance(&mut self, now: Instant, strip: &mut StripState) -> Option<&[Rgb]> {
        let active = usize::from(strip.active_led_count()).clamp(1, MAX_LEDS.max(1));
        if self.slot.id() != strip.active_pattern {
            self.slot = strip.active_pattern.to_slot();
            self.force_transmit = true;
        }

        if !strip.is_on {
            if self.off_sent {
                return None;
            }
            let len = self.lit_len.max(active).min(MAX_LEDS);
            fill_solid(&mut self.frame_buffer[..len], BLACK);
            self.off_sent = true;
            self.lit_len = 0;
            debug!("strip off, blanking {} pixels", len);
            return Some(&self.frame_buffer[..len]);
        }

        let was_off = core::mem::replace(&mut self.off_sent, false);
        let changed = self
            .slot
            .advance(now, strip, &mut self.frame_buffer[..active]);

        let shrunk = self.lit_len > active;
        let len = self.lit_len.max(active).min(MAX_LEDS);
        if shrunk {
            fill_solid(&mut self.frame_buffer[active..len], BLACK);
        }

        let force = core::mem::replace(&mut self.force_transmit, false);
        if !(changed || was_off || shrunk || force) {
            return None;
        }
        self.lit_len = active;
        Some(&self.frame_buffer[..len])
    }
}
