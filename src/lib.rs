#![no_std]

pub mod chipset;
pub mod color;
pub mod config;
pub mod context;
pub mod controller;
pub mod engine;
pub mod error;
pub mod gate;
pub mod input;
pub mod instruments;
#[cfg(feature = "esp32-log")]
pub mod logger;
pub mod output;
pub mod pattern;
pub mod ui;

pub use chipset::ChipsetVariant;
pub use config::{ConfigStore, MemoryStore, PersistedConfig};
pub use context::{AuxLed, ControlContext, LedChannelState, StripState};
pub use controller::{Controller, ControllerConfig, ControllerParts, CycleReport};
pub use engine::PatternEngine;
pub use error::{OutputError, SensorError, StoreError};
pub use gate::IntervalGate;
pub use input::{InputEvent, InputManager};
pub use instruments::{ChipInfo, Instruments, PowerReading};
pub use output::OutputDispatcher;
pub use pattern::{PatternId, PatternSlot};
pub use ui::{Display, Screen, UiState, UiStateMachine};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};
