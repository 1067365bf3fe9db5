//! Input acquisition
//!
//! Samples the buttons and the encoder, drains the text command channel and
//! folds everything into one [`InputEvent`] per cycle. Nothing here blocks.

mod debounce;
mod encoder;
mod quadrature;
mod serial;

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;
use log::{debug, warn};

pub use debounce::{DEFAULT_DEBOUNCE_DELAY, Debouncer, Edge};
pub use encoder::{
    DEFAULT_ENCODER_DIRECTION, EncoderDirection, EncoderReader, EncoderSource,
    SharedEncoderCounter,
};
pub use quadrature::{QuadratureDecoder, QuadratureState, decode_step, line_code};
pub use serial::{
    Command, CommandChannel, CommandDecoder, CommandReceiver, CommandSender, QueueFull,
};

/// Physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    /// Encoder push button
    Select = 0,
    /// Auxiliary user button
    User = 1,
    /// Auxiliary boot button
    Boot = 2,
}

impl ButtonId {
    pub const ALL: [Self; 3] = [Self::Select, Self::User, Self::Boot];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of buttons pressed in one cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSet(u8);

impl ButtonSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, button: ButtonId) {
        self.0 |= button.bit();
    }

    pub const fn contains(self, button: ButtonId) -> bool {
        self.0 & button.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ButtonId> {
        ButtonId::ALL.into_iter().filter(move |id| self.contains(*id))
    }
}

/// Everything that happened on the inputs during one cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputEvent {
    /// Physical encoder steps
    ///
    /// A per-cycle difference of the wrapping `i32` counter, so it never needs
    /// a wider type.
    pub encoder_delta: i32,
    /// Steps simulated with `+`/`-` commands, only honored inside a mode
    pub serial_steps: i32,
    /// Debounced presses (never releases)
    pub buttons: ButtonSet,
    /// Menu index requested by a digit command
    pub menu_jump: Option<u8>,
    /// At least one byte arrived on the command channel
    pub serial_activity: bool,
}

impl InputEvent {
    pub const fn pressed(&self, button: ButtonId) -> bool {
        self.buttons.contains(button)
    }

    /// Whether anything counts as user interaction
    pub const fn is_interaction(&self) -> bool {
        self.encoder_delta != 0
            || self.serial_steps != 0
            || !self.buttons.is_empty()
            || self.menu_jump.is_some()
            || self.serial_activity
    }
}

/// Pins of the three buttons, all active-low
pub struct ButtonPins<P> {
    pub select: P,
    pub user: P,
    pub boot: P,
}

struct ButtonChannel<P> {
    id: ButtonId,
    pin: P,
    debouncer: Debouncer,
}

impl<P: InputPin> ButtonChannel<P> {
    fn sample(&mut self, now: Instant) -> Option<Edge> {
        let raw_high = match self.pin.is_high() {
            Ok(level) => level,
            Err(err) => {
                warn!("button {:?} read failed: {:?}", self.id, err);
                self.debouncer.raw_is_high()
            }
        };
        self.debouncer.update(now, raw_high)
    }
}

/// Produces one [`InputEvent`] per cycle
pub struct InputManager<'a, P: InputPin, E: EncoderSource, const SERIAL: usize> {
    buttons: [ButtonChannel<P>; 3],
    encoder: EncoderReader<E>,
    commands: CommandReceiver<'a, SERIAL>,
    decoder: CommandDecoder,
}

impl<'a, P: InputPin, E: EncoderSource, const SERIAL: usize> InputManager<'a, P, E, SERIAL> {
    pub fn new(
        pins: ButtonPins<P>,
        encoder: EncoderReader<E>,
        commands: CommandReceiver<'a, SERIAL>,
        debounce_delay: Duration,
        now: Instant,
    ) -> Self {
        let channel = |id, pin| ButtonChannel {
            id,
            pin,
            debouncer: Debouncer::new(debounce_delay, now),
        };
        Self {
            buttons: [
                channel(ButtonId::Select, pins.select),
                channel(ButtonId::User, pins.user),
                channel(ButtonId::Boot, pins.boot),
            ],
            encoder,
            commands,
            decoder: CommandDecoder::new(),
        }
    }

    /// Sample all sources once
    pub fn poll(&mut self, now: Instant) -> InputEvent {
        let mut event = InputEvent {
            encoder_delta: self.encoder.delta(),
            ..InputEvent::default()
        };

        for button in &mut self.buttons {
            if button.sample(now) == Some(Edge::Pressed) {
                event.buttons.insert(button.id);
            }
        }

        while let Some(byte) = self.commands.try_receive() {
            event.serial_activity = true;
            match self.decoder.decode(byte) {
                Some(Command::SelectIndex(index)) => event.menu_jump = Some(index),
                Some(Command::Step(step)) => {
                    event.serial_steps = event.serial_steps.saturating_add(i32::from(step));
                }
                Some(Command::Select) => event.buttons.insert(ButtonId::Select),
                None => {}
            }
        }

        if event.is_interaction() {
            debug!("input: {:?}", event);
        }
        event
    }
}
