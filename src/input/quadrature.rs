//! Software quadrature decoding
//!
//! Used when no hardware pulse counter is available: both encoder lines are
//! sampled every cycle and each (previous, current) pair is looked up in a
//! transition table. Only single-step Gray-code moves count; a skipped or
//! impossible pair contributes nothing, which swallows most contact bounce.

use embedded_hal::digital::InputPin;
use log::warn;

use super::encoder::EncoderSource;

/// Count change for `(previous << 2) | current`, where each pair is `(a << 1) | b`
const TRANSITIONS: [i8; 16] = [
    0, -1, 1, 0, //
    1, 0, 0, -1, //
    -1, 0, 0, 1, //
    0, 1, -1, 0, //
];

/// Count change for moving from line pair `previous` to `current`
#[inline]
pub const fn decode_step(previous: u8, current: u8) -> i8 {
    TRANSITIONS[(((previous & 0b11) << 2) | (current & 0b11)) as usize]
}

/// Line pair as a 2-bit code
#[inline]
pub const fn line_code(a_high: bool, b_high: bool) -> u8 {
    ((a_high as u8) << 1) | b_high as u8
}

/// Pin-independent decoder state
#[derive(Debug, Clone, Default)]
pub struct QuadratureState {
    last_code: u8,
    count: i32,
}

impl QuadratureState {
    pub const fn new(a_high: bool, b_high: bool) -> Self {
        Self {
            last_code: line_code(a_high, b_high),
            count: 0,
        }
    }

    /// Feed one sample of both lines, returning the count change
    pub fn update(&mut self, a_high: bool, b_high: bool) -> i8 {
        let code = line_code(a_high, b_high);
        let step = decode_step(self.last_code, code);
        self.last_code = code;
        self.count = self.count.wrapping_add(i32::from(step));
        step
    }

    pub const fn count(&self) -> i32 {
        self.count
    }
}

/// Encoder decoded from two GPIO lines
pub struct QuadratureDecoder<A: InputPin, B: InputPin> {
    a: A,
    b: B,
    state: QuadratureState,
}

impl<A: InputPin, B: InputPin> QuadratureDecoder<A, B> {
    /// Create a decoder seeded from the current line levels
    ///
    /// A line that cannot be read starts out low.
    pub fn new(mut a: A, mut b: B) -> Self {
        let a_high = read_line(&mut a, 'A').unwrap_or(false);
        let b_high = read_line(&mut b, 'B').unwrap_or(false);
        Self {
            a,
            b,
            state: QuadratureState::new(a_high, b_high),
        }
    }

    /// Sample both lines once
    pub fn poll(&mut self) {
        if let (Some(a_high), Some(b_high)) =
            (read_line(&mut self.a, 'A'), read_line(&mut self.b, 'B'))
        {
            self.state.update(a_high, b_high);
        }
    }
}

fn read_line<P: InputPin>(pin: &mut P, name: char) -> Option<bool> {
    pin.is_high()
        .map_err(|err| warn!("encoder line {} read failed: {:?}", name, err))
        .ok()
}

impl<A: InputPin, B: InputPin> EncoderSource for QuadratureDecoder<A, B> {
    fn count(&mut self) -> i32 {
        self.poll();
        self.state.count()
    }
}
