use crate::context::AuxLed;

/// Which brightness a brightness mode adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrightnessTarget {
    Strip,
    Aux(AuxLed),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Light,
    Power,
}

/// What a mode does with the encoder and the select button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    /// Shows chip information, nothing to adjust
    Info,
    Brightness(BrightnessTarget),
    /// Periodic sensor readout
    Sensor(SensorKind),
    /// One-shot bus scan on entry
    BusScan,
    /// Cyclic choice applied immediately, not persisted
    PatternSelect,
    /// Cyclic choice persisted on commit, effective after restart
    ChipsetSelect,
    /// Bounded count persisted on commit
    LedCountSelect,
}

/// Operating modes, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeId {
    DeviceInfo,
    StripBrightness,
    Led2Brightness,
    Led3Brightness,
    Led4Brightness,
    LightSensor,
    PowerSensor,
    BusScan,
    Pattern,
    Chipset,
    LedCount,
}

impl ModeId {
    pub const ALL: [Self; 11] = [
        Self::DeviceInfo,
        Self::StripBrightness,
        Self::Led2Brightness,
        Self::Led3Brightness,
        Self::Led4Brightness,
        Self::LightSensor,
        Self::PowerSensor,
        Self::BusScan,
        Self::Pattern,
        Self::Chipset,
        Self::LedCount,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::DeviceInfo => "Device Info",
            Self::StripBrightness => "Strip Brightness",
            Self::Led2Brightness => "LED2 Brightness",
            Self::Led3Brightness => "LED3 Brightness",
            Self::Led4Brightness => "LED4 Brightness",
            Self::LightSensor => "Light Sensor",
            Self::PowerSensor => "Power Sensor",
            Self::BusScan => "I2C Scan",
            Self::Pattern => "Strip Pattern",
            Self::Chipset => "Strip Chipset",
            Self::LedCount => "LED Count",
        }
    }

    pub const fn kind(self) -> ModeKind {
        match self {
            Self::DeviceInfo => ModeKind::Info,
            Self::StripBrightness => ModeKind::Brightness(BrightnessTarget::Strip),
            Self::Led2Brightness => ModeKind::Brightness(BrightnessTarget::Aux(AuxLed::Led2)),
            Self::Led3Brightness => ModeKind::Brightness(BrightnessTarget::Aux(AuxLed::Led3)),
            Self::Led4Brightness => ModeKind::Brightness(BrightnessTarget::Aux(AuxLed::Led4)),
            Self::LightSensor => ModeKind::Sensor(SensorKind::Light),
            Self::PowerSensor => ModeKind::Sensor(SensorKind::Power),
            Self::BusScan => ModeKind::BusScan,
            Self::Pattern => ModeKind::PatternSelect,
            Self::Chipset => ModeKind::ChipsetSelect,
            Self::LedCount => ModeKind::LedCountSelect,
        }
    }
}

/// Ordered list of modes with a cursor
#[derive(Debug, Clone)]
pub struct MenuModel {
    modes: &'static [ModeId],
    selected: usize,
}

impl Default for MenuModel {
    fn default() -> Self {
        Self::new(&ModeId::ALL)
    }
}

impl MenuModel {
    /// `modes` must not be empty
    pub const fn new(modes: &'static [ModeId]) -> Self {
        Self { modes, selected: 0 }
    }

    pub const fn len(&self) -> usize {
        self.modes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_mode(&self) -> ModeId {
        self.modes
            .get(self.selected)
            .copied()
            .unwrap_or(ModeId::DeviceInfo)
    }

    /// Move the cursor by `delta`, stopping at either end
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn move_by(&mut self, delta: i32) {
        let last = self.modes.len().saturating_sub(1) as i64;
        let next = (self.selected as i64).saturating_add(i64::from(delta));
        self.selected = next.clamp(0, last) as usize;
    }

    /// Put the cursor on `index`, returning `false` if there is no such entry
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.modes.len() {
            return false;
        }
        self.selected = index;
        true
    }
}
