use crate::color::{Hsv, Rgb, hsv2rgb};

/// Fill the strip with a hue ramp starting at `start_hue`
///
/// Every next pixel is `hue_step` further around the 0-255 color wheel.
pub fn fill_rainbow(leds: &mut [Rgb], start_hue: u8, hue_step: u8, sat: u8, val: u8) {
    let mut hue = start_hue;
    for led in leds {
        *led = hsv2rgb(Hsv { hue, sat, val });
        hue = hue.wrapping_add(hue_step);
    }
}

/// Fill the strip with one color
pub fn fill_solid(leds: &mut [Rgb], color: Rgb) {
    for led in leds {
        *led = color;
    }
}

/// Equal-channel (white) value
#[inline]
pub const fn white(level: u8) -> Rgb {
    Rgb {
        r: level,
        g: level,
        b: level,
    }
}
