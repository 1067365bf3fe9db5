//! Output dispatch
//!
//! Pushes the auxiliary channel duties every cycle and the strip frame
//! whenever the engine produced one. Failures are logged and the cycle goes
//! on.
//!
//! The strip driver is expected to serialize pixels in WS2812 `g, r, b` order.
//! Frames reach it as logical RGB, corrected only for RGB-native chipsets.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;
use smart_leds::{SmartLedsWrite, brightness};

use crate::chipset::ChipsetVariant;
use crate::color::{ColorOrder, Rgb};
use crate::context::{ControlContext, LedChannelState};
use crate::error::OutputError;

pub struct OutputDispatcher<P: SetDutyCycle, W: SmartLedsWrite<Color = Rgb>> {
    pwm: [P; 3],
    strip: W,
    order: ColorOrder,
}

impl<P: SetDutyCycle, W: SmartLedsWrite<Color = Rgb>> OutputDispatcher<P, W> {
    /// Create a dispatcher for a strip started with `chipset`
    pub fn new(pwm: [P; 3], strip: W, chipset: ChipsetVariant) -> Self {
        Self {
            pwm,
            strip,
            order: chipset.color_order(),
        }
    }

    /// Apply the channel states and, if present, transmit `frame`
    pub fn dispatch(&mut self, context: &ControlContext, frame: Option<&[Rgb]>) {
        for (channel, state) in context.leds.iter().enumerate() {
            if let Err(err) = self.write_channel(channel, *state) {
                warn!("{}", err);
            }
        }

        if let Some(frame) = frame {
            if let Err(err) = self.write_frame(frame, context.strip.brightness) {
                warn!("{}", err);
            }
        }
    }

    fn write_channel(
        &mut self,
        channel: usize,
        state: LedChannelState,
    ) -> Result<(), OutputError> {
        self.pwm[channel]
            .set_duty_cycle_fraction(u16::from(state.duty()), u16::from(u8::MAX))
            .map_err(|_| OutputError::Pwm { channel })
    }

    fn write_frame(&mut self, frame: &[Rgb], level: u8) -> Result<(), OutputError> {
        let order = self.order;
        let pixels = brightness(frame.iter().map(|pixel| order.apply(*pixel)), level);
        self.strip.write(pixels).map_err(|_| OutputError::Strip)
    }

    pub fn strip(&self) -> &W {
        &self.strip
    }

    pub fn pwm(&self) -> &[P; 3] {
        &self.pwm
    }
}
