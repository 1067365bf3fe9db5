//! Addressable LED chipset variants
//!
//! The chipset is a restart-only setting: the value loaded at boot decides
//! how the output stage talks to the strip for the whole session. Selecting a
//! different variant from the menu only persists it.

use crate::color::ColorOrder;

const CHIPSET_NAME_WS2812: &str = "WS2812";
const CHIPSET_NAME_WS2811: &str = "WS2811";
const CHIPSET_NAME_SK6812: &str = "SK6812";
const CHIPSET_NAME_APA106: &str = "APA106";
const CHIPSET_NAME_WS2813: &str = "WS2813";

const CHIPSET_ID_WS2812: u8 = 0;
const CHIPSET_ID_WS2811: u8 = 1;
const CHIPSET_ID_SK6812: u8 = 2;
const CHIPSET_ID_APA106: u8 = 3;
const CHIPSET_ID_WS2813: u8 = 4;

/// Known strip chipsets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ChipsetVariant {
    #[default]
    Ws2812 = CHIPSET_ID_WS2812,
    Ws2811 = CHIPSET_ID_WS2811,
    Sk6812 = CHIPSET_ID_SK6812,
    Apa106 = CHIPSET_ID_APA106,
    Ws2813 = CHIPSET_ID_WS2813,
}

impl ChipsetVariant {
    /// All variants in selector order
    pub const ALL: [Self; 5] = [
        Self::Ws2812,
        Self::Ws2811,
        Self::Sk6812,
        Self::Apa106,
        Self::Ws2813,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            CHIPSET_ID_WS2812 => Self::Ws2812,
            CHIPSET_ID_WS2811 => Self::Ws2811,
            CHIPSET_ID_SK6812 => Self::Sk6812,
            CHIPSET_ID_APA106 => Self::Apa106,
            CHIPSET_ID_WS2813 => Self::Ws2813,
            _ => return None,
        })
    }

    pub const fn raw(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ws2812 => CHIPSET_NAME_WS2812,
            Self::Ws2811 => CHIPSET_NAME_WS2811,
            Self::Sk6812 => CHIPSET_NAME_SK6812,
            Self::Apa106 => CHIPSET_NAME_APA106,
            Self::Ws2813 => CHIPSET_NAME_WS2813,
        }
    }

    /// Native byte order of the chip
    pub const fn color_order(self) -> ColorOrder {
        match self {
            Self::Ws2812 | Self::Sk6812 | Self::Ws2813 => ColorOrder::Grb,
            Self::Ws2811 | Self::Apa106 => ColorOrder::Rgb,
        }
    }
}
