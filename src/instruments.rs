//! Sensor and board-information collaborators
//!
//! The drivers themselves live in the firmware; the controller only needs
//! these readings.

use heapless::Vec;

use crate::error::SensorError;

/// Most devices a bus scan reports
pub const MAX_BUS_DEVICES: usize = 16;

/// Addresses found by a bus scan
pub type BusDevices = Vec<u8, MAX_BUS_DEVICES>;

/// One reading of the power monitor
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerReading {
    pub bus_voltage_v: f32,
    pub shunt_voltage_mv: f32,
    pub current_ma: f32,
}

impl PowerReading {
    /// Voltage at the load side of the shunt
    pub fn load_voltage_v(&self) -> f32 {
        self.bus_voltage_v + self.shunt_voltage_mv / 1000.0
    }
}

/// Static facts about the controller chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipInfo {
    pub model: &'static str,
    pub revision: u8,
    pub cpu_mhz: u16,
    pub flash_mb: u16,
}

/// Sensors and board information
pub trait Instruments {
    /// Ambient light in lux
    fn read_light(&mut self) -> Result<f32, SensorError>;

    /// Bus voltage, shunt voltage and current
    fn read_power(&mut self) -> Result<PowerReading, SensorError>;

    /// Probe the sensor bus, writing responding addresses into `found`
    fn scan_bus(&mut self, found: &mut BusDevices) -> Result<(), SensorError>;

    fn chip_info(&self) -> ChipInfo;
}
