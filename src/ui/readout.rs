//! Last known sensor values
//!
//! A failed read is logged and leaves the previous value on screen.

use log::{debug, warn};

use crate::error::SensorError;
use crate::instruments::{BusDevices, ChipInfo, Instruments, PowerReading};

use super::menu::SensorKind;

#[derive(Debug, Clone, Default)]
pub struct Readouts {
    light_lux: Option<f32>,
    power: Option<PowerReading>,
    bus: Option<Result<BusDevices, SensorError>>,
    chip: Option<ChipInfo>,
    /// Error of the most recent sensor read, cleared by the next good one
    last_error: Option<SensorError>,
}

impl Readouts {
    /// Read one sensor, returning `true` if a new value was stored
    pub fn refresh<S: Instruments>(&mut self, kind: SensorKind, instruments: &mut S) -> bool {
        let result = match kind {
            SensorKind::Light => instruments.read_light().and_then(checked_lux).map(|lux| {
                debug!("light: {} lx", lux);
                self.light_lux = Some(lux);
            }),
            SensorKind::Power => instruments.read_power().map(|reading| {
                debug!(
                    "power: bus {} V, load {} V, {} mA",
                    reading.bus_voltage_v,
                    reading.load_voltage_v(),
                    reading.current_ma
                );
                self.power = Some(reading);
            }),
        };

        match result {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(err) => {
                warn!("{:?} sensor: {}, keeping last value", kind, err);
                self.last_error = Some(err);
                false
            }
        }
    }

    pub fn scan_bus<S: Instruments>(&mut self, instruments: &mut S) {
        let mut found = BusDevices::new();
        let result = instruments.scan_bus(&mut found).map(|()| found);
        match &result {
            Ok(devices) => debug!("bus scan: {} device(s)", devices.len()),
            Err(err) => warn!("bus scan failed: {}", err),
        }
        self.bus = Some(result);
    }

    pub fn read_chip_info<S: Instruments>(&mut self, instruments: &S) {
        self.chip = Some(instruments.chip_info());
    }

    pub const fn light_lux(&self) -> Option<f32> {
        self.light_lux
    }

    pub const fn power(&self) -> Option<PowerReading> {
        self.power
    }

    pub fn bus(&self) -> Option<&Result<BusDevices, SensorError>> {
        self.bus.as_ref()
    }

    pub const fn chip(&self) -> Option<ChipInfo> {
        self.chip
    }

    pub const fn last_error(&self) -> Option<SensorError> {
        self.last_error
    }
}

/// Reject light levels no sensor can produce
fn checked_lux(lux: f32) -> Result<f32, SensorError> {
    if lux >= 0.0 {
        Ok(lux)
    } else {
        Err(SensorError::InvalidReading)
    }
}
