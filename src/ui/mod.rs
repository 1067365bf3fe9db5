//! UI state machine
//!
//! Consumes one [`InputEvent`] per cycle and owns everything about menus and
//! modes: which state is active, the menu cursor, values proposed by the
//! selector modes, the confirmation banner and the sensor readouts shown in
//! sensor modes.
//!
//! Timed behavior (startup hold, idle timeout, banner, sensor polling) is
//! always "enough time has passed since X", checked on every update.

mod menu;
mod readout;
mod screen;

use core::fmt::Write;

use embassy_time::{Duration, Instant};
use heapless::Vec;
use log::{debug, info, warn};

pub use menu::{BrightnessTarget, MenuModel, ModeId, ModeKind, SensorKind};
pub use readout::Readouts;
pub use screen::{Display, Line, ReadoutRow, SCREEN_LINE_LEN, Screen, line};

use crate::chipset::ChipsetVariant;
use crate::config::ConfigStore;
use crate::context::{AuxLed, ControlContext, adjust_level};
use crate::gate::{IntervalGate, elapsed};
use crate::input::{ButtonId, InputEvent};
use crate::instruments::Instruments;
use crate::pattern::PatternId;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(60_000);
pub const DEFAULT_STARTUP_HOLD: Duration = Duration::from_millis(2_000);
pub const DEFAULT_BANNER_DURATION: Duration = Duration::from_millis(2_000);
pub const DEFAULT_SENSOR_INTERVAL: Duration = Duration::from_millis(2_000);
pub const DEFAULT_BRIGHTNESS_STEP: i32 = 5;

const SPLASH_TITLE: &str = "Strip Controller";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Startup,
    IdleSplash,
    Menu,
    Action,
}

/// Auxiliary channel flipped by each toggle button
#[derive(Debug, Clone, Copy)]
pub struct ToggleMap {
    pub user: AuxLed,
    pub boot: AuxLed,
}

impl Default for ToggleMap {
    fn default() -> Self {
        Self {
            user: AuxLed::Led4,
            boot: AuxLed::Led3,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UiConfig {
    pub idle_timeout: Duration,
    pub startup_hold: Duration,
    pub banner_duration: Duration,
    pub sensor_interval: Duration,
    /// Brightness change per encoder step
    pub brightness_step: i32,
    pub toggles: ToggleMap,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            startup_hold: DEFAULT_STARTUP_HOLD,
            banner_duration: DEFAULT_BANNER_DURATION,
            sensor_interval: DEFAULT_SENSOR_INTERVAL,
            brightness_step: DEFAULT_BRIGHTNESS_STEP,
            toggles: ToggleMap::default(),
        }
    }
}

/// Requests for other components, applied by the controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiEffects {
    /// Pattern picked in the pattern selector; restarts its sub-state
    pub select_pattern: Option<PatternId>,
}

/// Value being edited in a selector mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    None,
    Pattern(PatternId),
    Chipset(ChipsetVariant),
    LedCount(u16),
}

#[derive(Debug, Clone, Copy)]
struct Banner {
    first: &'static str,
    second: &'static str,
    until: Instant,
}

pub struct UiStateMachine {
    config: UiConfig,
    state: UiState,
    menu: MenuModel,
    current_mode: ModeId,
    proposal: Proposal,
    started_at: Instant,
    last_interaction: Instant,
    banner: Option<Banner>,
    sensor_gate: IntervalGate,
    readouts: Readouts,
    dirty: bool,
}

impl UiStateMachine {
    pub fn new(config: UiConfig, now: Instant) -> Self {
        Self {
            config,
            state: UiState::Startup,
            menu: MenuModel::default(),
            current_mode: ModeId::DeviceInfo,
            proposal: Proposal::None,
            started_at: now,
            last_interaction: now,
            banner: None,
            sensor_gate: IntervalGate::new(config.sensor_interval, now),
            readouts: Readouts::default(),
            dirty: true,
        }
    }

    /// Process one cycle of input
    pub fn update<K: ConfigStore, S: Instruments>(
        &mut self,
        now: Instant,
        event: &InputEvent,
        context: &mut ControlContext,
        store: &mut K,
        instruments: &mut S,
    ) -> UiEffects {
        let mut effects = UiEffects::default();

        self.apply_toggles(event, context);
        self.expire_banner(now);

        let interacted = event.is_interaction();
        let idle_for = elapsed(now, self.last_interaction);
        if interacted {
            self.last_interaction = now;
        }

        match self.state {
            UiState::Startup => {
                if interacted && elapsed(now, self.started_at) >= self.config.startup_hold {
                    self.enter_menu();
                }
            }
            UiState::IdleSplash => {
                if interacted {
                    info!("waking from idle");
                    self.enter_menu();
                }
            }
            UiState::Menu => {
                if interacted {
                    self.handle_menu_input(now, event, context, instruments);
                } else if idle_for >= self.config.idle_timeout {
                    info!("idle for {} ms", idle_for.as_millis());
                    self.set_state(UiState::IdleSplash);
                }
            }
            UiState::Action => {
                self.handle_action_input(now, event, context, store, &mut effects);
                if self.state == UiState::Action {
                    self.poll_sensor(now, instruments);
                }
            }
        }

        effects
    }

    fn apply_toggles(&mut self, event: &InputEvent, context: &mut ControlContext) {
        for (button, led) in [
            (ButtonId::User, self.config.toggles.user),
            (ButtonId::Boot, self.config.toggles.boot),
        ] {
            if event.pressed(button) {
                let channel = context.led_mut(led);
                channel.toggle();
                info!("{:?} toggled {:?} {}", button, led, on_off(channel.is_on));
                self.dirty = true;
            }
        }
    }

    fn expire_banner(&mut self, now: Instant) {
        if self.banner.is_some_and(|banner| now >= banner.until) {
            self.banner = None;
            self.dirty = true;
        }
    }

    fn handle_menu_input<S: Instruments>(
        &mut self,
        now: Instant,
        event: &InputEvent,
        context: &ControlContext,
        instruments: &mut S,
    ) {
        if event.encoder_delta != 0 {
            self.menu.move_by(event.encoder_delta);
            debug!("menu cursor: {}", self.menu.selected_index());
            self.dirty = true;
        }

        let mut enter = event.pressed(ButtonId::Select);
        if let Some(index) = event.menu_jump {
            if self.menu.select(usize::from(index)) {
                enter = true;
                self.dirty = true;
            } else {
                warn!("no menu entry {}", index);
            }
        }

        if enter {
            self.enter_mode(now, self.menu.selected_mode(), context, instruments);
        }
    }

    fn enter_mode<S: Instruments>(
        &mut self,
        now: Instant,
        mode: ModeId,
        context: &ControlContext,
        instruments: &mut S,
    ) {
        info!("entering mode: {}", mode.label());
        self.current_mode = mode;
        self.proposal = Proposal::None;
        self.banner = None;
        self.set_state(UiState::Action);

        match mode.kind() {
            ModeKind::Info => self.readouts.read_chip_info(&*instruments),
            ModeKind::Sensor(kind) => {
                self.readouts.refresh(kind, instruments);
                self.sensor_gate.restart(now);
            }
            ModeKind::BusScan => self.readouts.scan_bus(instruments),
            ModeKind::PatternSelect => {
                self.proposal = Proposal::Pattern(context.strip.active_pattern);
            }
            ModeKind::ChipsetSelect => {
                self.proposal = Proposal::Chipset(context.persisted.chipset);
            }
            ModeKind::LedCountSelect => {
                self.proposal = Proposal::LedCount(context.persisted.led_count);
            }
            ModeKind::Brightness(_) => {}
        }
    }

    fn handle_action_input<K: ConfigStore>(
        &mut self,
        now: Instant,
        event: &InputEvent,
        context: &mut ControlContext,
        store: &mut K,
        effects: &mut UiEffects,
    ) {
        let delta = event.encoder_delta.saturating_add(event.serial_steps);
        if delta != 0 {
            self.adjust(delta, context);
        }
        if event.pressed(ButtonId::Select) {
            self.commit(now, context, store, effects);
        }
    }

    fn adjust(&mut self, delta: i32, context: &mut ControlContext) {
        let step = self.config.brightness_step;
        match (self.current_mode.kind(), self.proposal) {
            (ModeKind::Brightness(BrightnessTarget::Strip), _) => {
                let strip = &mut context.strip;
                strip.brightness = adjust_level(strip.brightness, delta, step);
                strip.is_on = true;
                debug!("strip brightness: {}", strip.brightness);
            }
            (ModeKind::Brightness(BrightnessTarget::Aux(led)), _) => {
                let channel = context.led_mut(led);
                channel.brightness = adjust_level(channel.brightness, delta, step);
                channel.is_on = true;
                debug!("{:?} brightness: {}", led, channel.brightness);
            }
            (ModeKind::PatternSelect, Proposal::Pattern(current)) => {
                let index = cycle_index(usize::from(current.raw()), delta, PatternId::ALL.len());
                self.proposal = Proposal::Pattern(PatternId::ALL[index]);
            }
            (ModeKind::ChipsetSelect, Proposal::Chipset(current)) => {
                let index = cycle_index(
                    usize::from(current.raw()),
                    delta,
                    ChipsetVariant::ALL.len(),
                );
                self.proposal = Proposal::Chipset(ChipsetVariant::ALL[index]);
            }
            (ModeKind::LedCountSelect, Proposal::LedCount(current)) => {
                let max = i32::from(context.strip.max_leds());
                let next = i32::from(current).saturating_add(delta).clamp(1, max);
                self.proposal = Proposal::LedCount(u16::try_from(next).unwrap_or(1));
            }
            (kind, _) => {
                debug!("encoder ignored in {:?}", kind);
                return;
            }
        }
        self.dirty = true;
    }

    fn commit<K: ConfigStore>(
        &mut self,
        now: Instant,
        context: &mut ControlContext,
        store: &mut K,
        effects: &mut UiEffects,
    ) {
        match self.proposal {
            Proposal::Chipset(chipset) => {
                let saved = context.persisted.commit_chipset(store, chipset);
                info!("chipset {} committed", chipset.as_str());
                self.confirm(now, saved.is_ok(), "Restart to apply");
                if let Err(err) = saved {
                    warn!("chipset not persisted: {}", err);
                }
            }
            Proposal::LedCount(count) => {
                context.strip.set_active_led_count(count);
                let saved = context.persisted.commit_led_count(store, count);
                info!("LED count {} committed", count);
                self.confirm(now, saved.is_ok(), "Applied");
                if let Err(err) = saved {
                    warn!("LED count not persisted: {}", err);
                }
            }
            Proposal::Pattern(pattern) => {
                info!("pattern {} selected", pattern.as_str());
                effects.select_pattern = Some(pattern);
            }
            Proposal::None => {}
        }
        self.proposal = Proposal::None;
        self.enter_menu();
    }

    fn confirm(&mut self, now: Instant, saved: bool, detail: &'static str) {
        let (first, second) = if saved {
            ("Saved", detail)
        } else {
            ("Save failed", "Active until restart")
        };
        self.banner = Some(Banner {
            first,
            second,
            until: now + self.config.banner_duration,
        });
    }

    fn poll_sensor<S: Instruments>(&mut self, now: Instant, instruments: &mut S) {
        if let ModeKind::Sensor(kind) = self.current_mode.kind() {
            if self.sensor_gate.ready(now) && self.readouts.refresh(kind, instruments) {
                self.dirty = true;
            }
        }
    }

    fn enter_menu(&mut self) {
        self.set_state(UiState::Menu);
    }

    fn set_state(&mut self, state: UiState) {
        if self.state != state {
            debug!("ui state: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
        self.dirty = true;
    }

    /// Returns whether the screen changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// What the display should show right now
    pub fn screen(&self, context: &ControlContext) -> Screen {
        match self.state {
            UiState::Startup | UiState::IdleSplash => Screen::Splash {
                title: SPLASH_TITLE,
                version: env!("CARGO_PKG_VERSION"),
            },
            UiState::Menu => match self.banner {
                Some(banner) => Screen::text(banner.first, banner.second),
                None => self.menu_screen(),
            },
            UiState::Action => self.mode_screen(context),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn menu_screen(&self) -> Screen {
        let mode = self.menu.selected_mode();
        Screen::Menu {
            index: self.menu.selected_index() as u8,
            count: self.menu.len() as u8,
            label: mode.label(),
        }
    }

    fn mode_screen(&self, context: &ControlContext) -> Screen {
        let label = self.current_mode.label();
        match (self.current_mode.kind(), self.proposal) {
            (ModeKind::Info, _) => match self.readouts.chip() {
                Some(chip) => {
                    let mut first = Line::new();
                    let mut second = Line::new();
                    let _ = write!(first, "{} rev {}", chip.model, chip.revision);
                    let _ = write!(second, "{} MHz {} MB", chip.cpu_mhz, chip.flash_mb);
                    Screen::Text { first, second }
                }
                None => Screen::text(label, "--"),
            },
            (ModeKind::Brightness(target), _) => {
                let value = match target {
                    BrightnessTarget::Strip => context.strip.brightness,
                    BrightnessTarget::Aux(led) => context.led(led).brightness,
                };
                Screen::Value {
                    label,
                    value: i32::from(value),
                    unit: "",
                }
            }
            (ModeKind::Sensor(kind), _) => self.readout_screen(kind),
            (ModeKind::BusScan, _) => self.bus_screen(),
            (ModeKind::PatternSelect, Proposal::Pattern(pattern)) => Screen::Choice {
                label,
                option: pattern.as_str(),
            },
            (ModeKind::ChipsetSelect, Proposal::Chipset(chipset)) => Screen::Choice {
                label,
                option: chipset.as_str(),
            },
            (ModeKind::LedCountSelect, Proposal::LedCount(count)) => Screen::Value {
                label,
                value: i32::from(count),
                unit: "LEDs",
            },
            _ => Screen::text(label, ""),
        }
    }

    fn readout_screen(&self, kind: SensorKind) -> Screen {
        let mut rows = Vec::new();
        let label = match kind {
            SensorKind::Light => {
                if let Some(lux) = self.readouts.light_lux() {
                    let _ = rows.push(ReadoutRow {
                        name: "Light",
                        value: lux,
                        unit: "lx",
                    });
                }
                "Light"
            }
            SensorKind::Power => {
                if let Some(power) = self.readouts.power() {
                    let _ = rows.push(ReadoutRow {
                        name: "Bus",
                        value: power.bus_voltage_v,
                        unit: "V",
                    });
                    let _ = rows.push(ReadoutRow {
                        name: "Load",
                        value: power.load_voltage_v(),
                        unit: "V",
                    });
                    let _ = rows.push(ReadoutRow {
                        name: "Current",
                        value: power.current_ma,
                        unit: "mA",
                    });
                }
                "Power"
            }
        };
        Screen::Readout { label, rows }
    }

    fn bus_screen(&self) -> Screen {
        match self.readouts.bus() {
            Some(Ok(devices)) => {
                let mut first = Line::new();
                let mut second = Line::new();
                let _ = write!(first, "I2C: {} device(s)", devices.len());
                for address in devices {
                    if write!(second, "0x{:02X} ", address).is_err() {
                        break;
                    }
                }
                Screen::Text { first, second }
            }
            Some(Err(_)) => Screen::text("I2C scan", "failed"),
            None => Screen::text("I2C scan", "--"),
        }
    }

    pub const fn state(&self) -> UiState {
        self.state
    }

    pub const fn current_mode(&self) -> ModeId {
        self.current_mode
    }

    pub const fn selected_index(&self) -> usize {
        self.menu.selected_index()
    }

    pub const fn proposal(&self) -> Proposal {
        self.proposal
    }

    pub fn banner_active(&self) -> bool {
        self.banner.is_some()
    }

    pub const fn readouts(&self) -> &Readouts {
        &self.readouts
    }
}

/// Step through `len` options with wrap-around in both directions
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cycle_index(current: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (current as i64 + i64::from(delta)).rem_euclid(len) as usize
}

const fn on_off(is_on: bool) -> &'static str {
    if is_on { "on" } else { "off" }
}
