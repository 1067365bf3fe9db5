use crate::color::Rgb;

/// Native byte order of a strip chipset
///
/// `smart-leds` WS2812 drivers serialize every pixel as `g, r, b` and own that
/// wire order, so GRB chips get logical colors untouched. RGB-native chips on
/// the same driver need red and green swapped to read the intended color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOrder {
    Rgb,
    Grb,
}

impl ColorOrder {
    /// Correct a logical color for a GRB-serializing driver
    #[inline]
    pub const fn apply(self, color: Rgb) -> Rgb {
        match self {
            Self::Grb => color,
            Self::Rgb => Rgb {
                r: color.g,
                g: color.r,
                b: color.b,
            },
        }
    }
}
