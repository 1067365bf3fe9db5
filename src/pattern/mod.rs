//! Pattern system with compile-time known pattern variants
//!
//! All patterns are stored in an enum to avoid heap allocations.
//! Each pattern implements the `Pattern` trait and owns its own sub-state.

mod chase;
mod checker;
mod rainbow;

use embassy_time::Instant;

pub use chase::{CHASE_FADE_RATE, CHASE_STEP_INCREMENT, CHASE_STEP_INTERVAL, ChasePattern};
pub use checker::{
    CheckerStage, INTER_COLOR_DELAY, PULSE_OFF_TIME, PULSE_ON_TIME, RgbCheckerPattern,
};
pub use rainbow::{RAINBOW_HUE_STEP, RAINBOW_PHASE_STEP, RainbowPattern};

use crate::color::Rgb;
use crate::context::StripState;

const PATTERN_NAME_RAINBOW: &str = "rainbow";
const PATTERN_NAME_RGB_CHECKER: &str = "rgb_checker";
const PATTERN_NAME_CHASE: &str = "chase";

const PATTERN_ID_RAINBOW: u8 = 0;
const PATTERN_ID_RGB_CHECKER: u8 = 1;
const PATTERN_ID_CHASE: u8 = 2;

pub trait Pattern {
    /// Advance the animation and write the frame into `leds`
    ///
    /// `leds` always covers exactly the active part of the strip. The whole
    /// slice is rewritten on every call; the return value tells whether the
    /// content differs from the previous call and should be transmitted.
    fn advance(&mut self, now: Instant, strip: &mut StripState, leds: &mut [Rgb]) -> bool;

    /// Clear timers and counters
    fn reset(&mut self) {}
}

/// Pattern slot - enum containing all possible patterns
#[derive(Debug, Clone)]
pub enum PatternSlot {
    Rainbow(RainbowPattern),
    RgbChecker(RgbCheckerPattern),
    Chase(ChasePattern),
}

/// Known pattern ids that can be selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum PatternId {
    #[default]
    Rainbow = PATTERN_ID_RAINBOW,
    RgbChecker = PATTERN_ID_RGB_CHECKER,
    Chase = PATTERN_ID_CHASE,
}

impl Default for PatternSlot {
    fn default() -> Self {
        Self::Rainbow(RainbowPattern::default())
    }
}

impl PatternId {
    /// All patterns in selector order
    pub const ALL: [Self; 3] = [Self::Rainbow, Self::RgbChecker, Self::Chase];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PATTERN_ID_RAINBOW => Self::Rainbow,
            PATTERN_ID_RGB_CHECKER => Self::RgbChecker,
            PATTERN_ID_CHASE => Self::Chase,
            _ => return None,
        })
    }

    pub const fn raw(self) -> u8 {
        self as u8
    }

    pub fn to_slot(self) -> PatternSlot {
        match self {
            Self::Rainbow => PatternSlot::Rainbow(RainbowPattern::default()),
            Self::RgbChecker => PatternSlot::RgbChecker(RgbCheckerPattern::default()),
            Self::Chase => PatternSlot::Chase(ChasePattern::default()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rainbow => PATTERN_NAME_RAINBOW,
            Self::RgbChecker => PATTERN_NAME_RGB_CHECKER,
            Self::Chase => PATTERN_NAME_CHASE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PATTERN_NAME_RAINBOW => Some(Self::Rainbow),
            PATTERN_NAME_RGB_CHECKER => Some(Self::RgbChecker),
            PATTERN_NAME_CHASE => Some(Self::Chase),
            _ => None,
        }
    }
}

impl PatternSlot {
    /// Advance the current pattern
    pub fn advance(&mut self, now: Instant, strip: &mut StripState, leds: &mut [Rgb]) -> bool {
        match self {
            Self::Rainbow(pattern) => pattern.advance(now, strip, leds),
            Self::RgbChecker(pattern) => pattern.advance(now, strip, leds),
            Self::Chase(pattern) => pattern.advance(now, strip, leds),
        }
    }

    /// Reset the pattern state
    pub fn reset(&mut self) {
        match self {
            Self::Rainbow(pattern) => Pattern::reset(pattern),
            Self::RgbChecker(pattern) => Pattern::reset(pattern),
            Self::Chase(pattern) => Pattern::reset(pattern),
        }
    }

    /// Get the pattern ID for external observation
    pub fn id(&self) -> PatternId {
        match self {
            Self::Rainbow(_) => PatternId::Rainbow,
            Self::RgbChecker(_) => PatternId::RgbChecker,
            Self::Chase(_) => PatternId::Chase,
        }
    }
}
