#![allow(dead_code)]

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorKind, ErrorType as PinErrorType, InputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};
use myrtio_strip_controller::instruments::BusDevices;
use myrtio_strip_controller::{
    ChipInfo, ConfigStore, Display, Instant, Instruments, PowerReading, Rgb, Screen, SensorError,
    StoreError,
};
use smart_leds::SmartLedsWrite;

pub fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

/// Input line whose level the test flips from outside
#[derive(Clone)]
pub struct FakePin {
    high: Rc<Cell<bool>>,
    failing: Rc<Cell<bool>>,
}

impl FakePin {
    pub fn new(high: bool) -> Self {
        Self {
            high: Rc::new(Cell::new(high)),
            failing: Rc::new(Cell::new(false)),
        }
    }

    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }

    /// Make every read return an error until cleared
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    fn level(&self) -> Result<bool, ErrorKind> {
        if self.failing.get() {
            Err(ErrorKind::Other)
        } else {
            Ok(self.high.get())
        }
    }
}

impl PinErrorType for FakePin {
    type Error = ErrorKind;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.level()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.level().map(|high| !high)
    }
}

/// PWM channel with an 8-bit range that remembers its duty
#[derive(Default)]
pub struct FakePwm {
    pub duty: u16,
    pub writes: usize,
}

impl PwmErrorType for FakePwm {
    type Error = Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        self.writes += 1;
        Ok(())
    }
}

/// Strip driver recording every transmitted frame
///
/// Like the WS2812 drivers it stands in for, it serializes each pixel as
/// `g, r, b` into `wire`.
#[derive(Default)]
pub struct FakeStrip {
    pub frames: Vec<Vec<Rgb>>,
    pub wire: Vec<Vec<u8>>,
}

impl FakeStrip {
    /// Bytes of the last frame, grouped per pixel
    pub fn last_wire(&self) -> Vec<[u8; 3]> {
        self.wire
            .last()
            .map(|bytes| {
                bytes
                    .chunks_exact(3)
                    .map(|chunk| [chunk[0], chunk[1], chunk[2]])
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl SmartLedsWrite for FakeStrip {
    type Error = Infallible;
    type Color = Rgb;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let pixels: Vec<Rgb> = iterator.into_iter().map(Into::into).collect();
        self.wire
            .push(pixels.iter().flat_map(|pixel| [pixel.g, pixel.r, pixel.b]).collect());
        self.frames.push(pixels);
        Ok(())
    }
}

pub struct FakeInstruments {
    pub light: Result<f32, SensorError>,
    pub power: Result<PowerReading, SensorError>,
    pub bus: Result<Vec<u8>, SensorError>,
    pub light_reads: usize,
    pub power_reads: usize,
    pub scans: usize,
}

impl Default for FakeInstruments {
    fn default() -> Self {
        Self {
            light: Ok(12.5),
            power: Ok(PowerReading {
                bus_voltage_v: 5.0,
                shunt_voltage_mv: 20.0,
                current_ma: 350.0,
            }),
            bus: Ok(vec![0x23, 0x40]),
            light_reads: 0,
            power_reads: 0,
            scans: 0,
        }
    }
}

impl Instruments for FakeInstruments {
    fn read_light(&mut self) -> Result<f32, SensorError> {
        self.light_reads += 1;
        self.light
    }

    fn read_power(&mut self) -> Result<PowerReading, SensorError> {
        self.power_reads += 1;
        self.power
    }

    fn scan_bus(&mut self, found: &mut BusDevices) -> Result<(), SensorError> {
        self.scans += 1;
        let addresses = self.bus.clone()?;
        for address in addresses {
            found.push(address).map_err(|_| SensorError::Bus)?;
        }
        Ok(())
    }

    fn chip_info(&self) -> ChipInfo {
        ChipInfo {
            model: "ESP32",
            revision: 3,
            cpu_mhz: 240,
            flash_mb: 4,
        }
    }
}

/// Display keeping every screen it was asked to show
#[derive(Default)]
pub struct FakeDisplay {
    pub screens: Vec<Screen>,
}

impl Display for FakeDisplay {
    fn show(&mut self, screen: &Screen) {
        self.screens.push(screen.clone());
    }
}

/// Store on which every read and write fails
#[derive(Default)]
pub struct FailingStore {
    pub writes: usize,
}

impl ConfigStore for FailingStore {
    fn get_int(
        &mut self,
        _namespace: &str,
        key: &'static str,
        _default: i32,
    ) -> Result<i32, StoreError> {
        Err(StoreError::Read { key })
    }

    fn put_int(
        &mut self,
        _namespace: &str,
        key: &'static str,
        _value: i32,
    ) -> Result<(), StoreError> {
        self.writes += 1;
        Err(StoreError::Write { key })
    }
}
