//! RGB channel checker
//!
//! Blinks the whole strip red once, green twice, blue three times, then
//! starts over. Useful for spotting a wrong color order at a glance. All
//! transitions are measured from the instant of the previous transition, so
//! a slow or jittery loop stretches nothing but the reaction latency.

use embassy_time::{Duration, Instant};

use super::Pattern;
use crate::color::{BLACK, BLUE, GREEN, RED, Rgb, fill_solid};
use crate::context::StripState;
use crate::gate::elapsed;

pub const PULSE_ON_TIME: Duration = Duration::from_millis(500);
pub const PULSE_OFF_TIME: Duration = Duration::from_millis(250);
pub const INTER_COLOR_DELAY: Duration = Duration::from_millis(600);

/// Color currently being checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerStage {
    Red,
    Green,
    Blue,
}

impl CheckerStage {
    pub const fn color(self) -> Rgb {
        match self {
            Self::Red => RED,
            Self::Green => GREEN,
            Self::Blue => BLUE,
        }
    }

    /// Pulses shown before moving to the next color
    pub const fn required_pulses(self) -> u8 {
        match self {
            Self::Red => 1,
            Self::Green => 2,
            Self::Blue => 3,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Blue,
            Self::Blue => Self::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckerPhase {
    /// Nothing shown yet
    Start,
    /// Solid color of the current stage
    PulseOn,
    /// Black between pulses
    PulseOff,
    /// Black between stages
    InterColor,
}

#[derive(Debug, Clone)]
pub struct RgbCheckerPattern {
    stage: CheckerStage,
    pulse_count: u8,
    phase: CheckerPhase,
    last_action: Instant,
}

impl Default for RgbCheckerPattern {
    fn default() -> Self {
        Self {
            stage: CheckerStage::Red,
            pulse_count: 0,
            phase: CheckerPhase::Start,
            last_action: Instant::from_millis(0),
        }
    }
}

impl RgbCheckerPattern {
    pub const fn stage(&self) -> CheckerStage {
        self.stage
    }

    /// Pulses completed in the current stage
    pub const fn pulse_count(&self) -> u8 {
        self.pulse_count
    }

    /// Whether the stage color is currently lit
    pub fn is_lit(&self) -> bool {
        self.phase == CheckerPhase::PulseOn
    }

    /// Move to the next phase if its time has come
    ///
    /// Returns `true` when the visible output changed.
    fn step(&mut self, now: Instant) -> bool {
        let since = elapsed(now, self.last_action);
        match self.phase {
            CheckerPhase::Start => {
                self.phase = CheckerPhase::PulseOn;
            }
            CheckerPhase::PulseOn if since >= PULSE_ON_TIME => {
                self.pulse_count = self.pulse_count.saturating_add(1);
                self.phase = CheckerPhase::PulseOff;
            }
            CheckerPhase::PulseOff if since >= PULSE_OFF_TIME => {
                if self.pulse_count >= self.stage.required_pulses() {
                    self.phase = CheckerPhase::InterColor;
                    self.last_action = now;
                    // Still black, nothing new to show
                    return false;
                }
                self.phase = CheckerPhase::PulseOn;
            }
            CheckerPhase::InterColor if since >= INTER_COLOR_DELAY => {
                self.stage = self.stage.next();
                self.pulse_count = 0;
                self.phase = CheckerPhase::PulseOn;
            }
            _ => return false,
        }
        self.last_action = now;
        true
    }
}

impl Pattern for RgbCheckerPattern {
    fn advance(&mut self, now: Instant, _strip: &mut StripState, leds: &mut [Rgb]) -> bool {
        let changed = self.step(now);
        let color = if self.is_lit() {
            self.stage.color()
        } else {
            BLACK
        };
        fill_solid(leds, color);
        changed
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
