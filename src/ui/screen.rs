//! Screen model handed to the display
//!
//! The display collaborator decides fonts, layout and refresh mechanics; the
//! controller only says what should be on screen.

use heapless::{String, Vec};

/// Longest text line a screen carries
pub const SCREEN_LINE_LEN: usize = 24;

pub type Line = String<SCREEN_LINE_LEN>;

/// One labeled number of a readout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadoutRow {
    pub name: &'static str,
    pub value: f32,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Boot and idle splash
    Splash {
        title: &'static str,
        version: &'static str,
    },
    /// Menu cursor
    Menu {
        index: u8,
        count: u8,
        label: &'static str,
    },
    /// Adjustable number
    Value {
        label: &'static str,
        value: i32,
        unit: &'static str,
    },
    /// Current option of a selector
    Choice {
        label: &'static str,
        option: &'static str,
    },
    /// Sensor values; empty until the first good reading
    Readout {
        label: &'static str,
        rows: Vec<ReadoutRow, 3>,
    },
    /// Free text
    Text { first: Line, second: Line },
}

impl Screen {
    /// Two lines of text, truncated at a character boundary to fit
    pub fn text(first: &str, second: &str) -> Self {
        Self::Text {
            first: line(first),
            second: line(second),
        }
    }
}

/// Copy as much of `text` as fits into a [`Line`]
pub fn line(text: &str) -> Line {
    let mut out = Line::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Renders [`Screen`]s
pub trait Display {
    fn show(&mut self, screen: &Screen);
}
