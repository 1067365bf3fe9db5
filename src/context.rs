//! Shared control context
//!
//! All state that more than one component looks at lives here and is handed
//! to each component's update call by `&mut`. Components keep their private
//! state to themselves.

use crate::chipset::ChipsetVariant;
use crate::config::PersistedConfig;
use crate::pattern::PatternId;

/// Default strip brightness at boot
pub const DEFAULT_STRIP_BRIGHTNESS: u8 = 128;

/// Add `delta * step` to a brightness value, clamped to 0-255
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn adjust_level(value: u8, delta: i32, step: i32) -> u8 {
    let next = i32::from(value).saturating_add(delta.saturating_mul(step));
    next.clamp(0, i32::from(u8::MAX)) as u8
}

/// Parameters of the addressable strip
#[derive(Debug, Clone)]
pub struct StripState {
    pub is_on: bool,
    pub brightness: u8,
    /// Rainbow phase, wraps around 0-255
    pub animation_phase: u8,
    pub active_pattern: PatternId,
    active_led_count: u16,
    max_leds: u16,
    /// Variant the strip was started with. Never changes while running.
    chipset: ChipsetVariant,
}

impl StripState {
    pub fn new(max_leds: u16, persisted: PersistedConfig) -> Self {
        let max_leds = max_leds.max(1);
        Self {
            is_on: true,
            brightness: DEFAULT_STRIP_BRIGHTNESS,
            animation_phase: 0,
            active_pattern: PatternId::default(),
            active_led_count: persisted.led_count.clamp(1, max_leds),
            max_leds,
            chipset: persisted.chipset,
        }
    }

    pub const fn active_led_count(&self) -> u16 {
        self.active_led_count
    }

    /// Set the number of driven pixels, clamped to `1..=max_leds`
    pub fn set_active_led_count(&mut self, count: u16) {
        self.active_led_count = count.clamp(1, self.max_leds);
    }

    pub const fn max_leds(&self) -> u16 {
        self.max_leds
    }

    pub const fn chipset(&self) -> ChipsetVariant {
        self.chipset
    }
}

/// Auxiliary single-color PWM channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxLed {
    Led2 = 0,
    Led3 = 1,
    Led4 = 2,
}

impl AuxLed {
    pub const ALL: [Self; 3] = [Self::Led2, Self::Led3, Self::Led4];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// On/off state and brightness of one auxiliary channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedChannelState {
    pub is_on: bool,
    pub brightness: u8,
}

impl LedChannelState {
    /// Duty value the channel should be driven with
    pub const fn duty(self) -> u8 {
        if self.is_on { self.brightness } else { 0 }
    }

    pub fn toggle(&mut self) {
        self.is_on = !self.is_on;
    }
}

/// Everything the components share, owned by the controller
#[derive(Debug, Clone)]
pub struct ControlContext {
    pub strip: StripState,
    pub leds: [LedChannelState; 3],
    /// Last values read from or committed to the config store
    pub persisted: PersistedConfig,
}

impl ControlContext {
    pub fn new(max_leds: u16, persisted: PersistedConfig) -> Self {
        Self {
            strip: StripState::new(max_leds, persisted),
            leds: [LedChannelState::default(); 3],
            persisted,
        }
    }

    pub fn led(&self, led: AuxLed) -> LedChannelState {
        self.leds[led.index()]
    }

    pub fn led_mut(&mut self, led: AuxLed) -> &mut LedChannelState {
        &mut self.leds[led.index()]
    }
}
