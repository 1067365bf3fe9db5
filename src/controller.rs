//! Control loop
//!
//! Runs one cycle per [`Controller::tick`] without waiting on anything. The
//! caller sleeps between cycles using the returned [`CycleReport`].
//!
//! ```ignore
//! let mut controller = Controller::new(ControllerConfig::default(), parts, &mut store, now);
//!
//! loop {
//!     let report = controller.tick(Instant::now(), &mut store, &mut instruments, &mut display);
//!     Timer::after(report.sleep_duration).await;
//! }
//! ```

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::{debug, info};
use smart_leds::SmartLedsWrite;

use crate::color::Rgb;
use crate::config::{ConfigStore, PersistedConfig};
use crate::context::ControlContext;
use crate::engine::PatternEngine;
use crate::input::{
    ButtonPins, CommandReceiver, DEFAULT_DEBOUNCE_DELAY, DEFAULT_ENCODER_DIRECTION,
    EncoderDirection, EncoderReader, EncoderSource, InputManager,
};
use crate::instruments::Instruments;
use crate::output::OutputDispatcher;
use crate::ui::{Display, UiConfig, UiState, UiStateMachine};

/// Default loop period (100 cycles per second)
pub const DEFAULT_CYCLE_PERIOD: Duration = Duration::from_millis(10);

/// Tunables of the whole loop
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    pub cycle_period: Duration,
    pub debounce_delay: Duration,
    pub encoder_direction: EncoderDirection,
    /// Raw encoder counts per menu step
    pub counts_per_step: i32,
    pub ui: UiConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cycle_period: DEFAULT_CYCLE_PERIOD,
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            encoder_direction: DEFAULT_ENCODER_DIRECTION,
            counts_per_step: 1,
            ui: UiConfig::default(),
        }
    }
}

/// Hardware handed to the controller at boot
pub struct ControllerParts<'a, P, E, D, W, const SERIAL: usize> {
    pub buttons: ButtonPins<P>,
    pub encoder: E,
    pub commands: CommandReceiver<'a, SERIAL>,
    /// LED 2, LED 3 and LED 4, in that order
    pub pwm: [D; 3],
    pub strip: W,
}

/// Outcome of one cycle
#[derive(Debug, Clone, Copy)]
pub struct CycleReport {
    pub state: UiState,
    /// A strip frame was written
    pub transmitted: bool,
    /// The display was handed a new screen
    pub display_refreshed: bool,
    pub next_deadline: Instant,
    /// How long to wait before the next tick (zero when behind)
    pub sleep_duration: Duration,
}

pub struct Controller<'a, P, E, D, W, const MAX_LEDS: usize, const SERIAL: usize>
where
    P: InputPin,
    E: EncoderSource,
    D: SetDutyCycle,
    W: SmartLedsWrite<Color = Rgb>,
{
    input: InputManager<'a, P, E, SERIAL>,
    ui: UiStateMachine,
    engine: PatternEngine<MAX_LEDS>,
    output: OutputDispatcher<D, W>,
    context: ControlContext,
    cycle_period: Duration,
    next_cycle: Instant,
}

impl<'a, P, E, D, W, const MAX_LEDS: usize, const SERIAL: usize>
    Controller<'a, P, E, D, W, MAX_LEDS, SERIAL>
where
    P: InputPin,
    E: EncoderSource,
    D: SetDutyCycle,
    W: SmartLedsWrite<Color = Rgb>,
{
    /// Load the persisted settings and assemble the loop
    pub fn new<K: ConfigStore>(
        config: ControllerConfig,
        parts: ControllerParts<'a, P, E, D, W, SERIAL>,
        store: &mut K,
        now: Instant,
    ) -> Self {
        let max_leds = u16::try_from(MAX_LEDS).unwrap_or(u16::MAX);
        let persisted = PersistedConfig::load(store, max_leds);
        let context = ControlContext::new(max_leds, persisted);

        let encoder = EncoderReader::new(
            parts.encoder,
            config.encoder_direction,
            config.counts_per_step,
        );
        let input = InputManager::new(
            parts.buttons,
            encoder,
            parts.commands,
            config.debounce_delay,
            now,
        );

        info!(
            "controller ready: {} of {} LEDs, {}",
            context.strip.active_led_count(),
            max_leds,
            context.strip.chipset().as_str()
        );

        Self {
            input,
            ui: UiStateMachine::new(config.ui, now),
            engine: PatternEngine::new(context.strip.active_pattern),
            output: OutputDispatcher::new(parts.pwm, parts.strip, context.strip.chipset()),
            context,
            cycle_period: config.cycle_period,
            next_cycle: now,
        }
    }

    /// Run one cycle
    pub fn tick<K, S, V>(
        &mut self,
        now: Instant,
        store: &mut K,
        instruments: &mut S,
        display: &mut V,
    ) -> CycleReport
    where
        K: ConfigStore,
        S: Instruments,
        V: Display,
    {
        // Skip the backlog after a long stall instead of running a burst
        let max_drift = self.cycle_period.as_millis() * 2;
        if now.as_millis() > self.next_cycle.as_millis() + max_drift {
            debug!("cycle overrun, resetting schedule");
            self.next_cycle = now;
        }

        let event = self.input.poll(now);
        let effects = self
            .ui
            .update(now, &event, &mut self.context, store, instruments);
        if let Some(pattern) = effects.select_pattern {
            self.engine.select(pattern, &mut self.context.strip);
        }

        let frame = self.engine.advance(now, &mut self.context.strip);
        let transmitted = frame.is_some();
        self.output.dispatch(&self.context, frame);

        let display_refreshed = self.ui.take_dirty();
        if display_refreshed {
            display.show(&self.ui.screen(&self.context));
        }

        self.next_cycle += self.cycle_period;
        let sleep_duration = Duration::from_millis(
            self.next_cycle.as_millis().saturating_sub(now.as_millis()),
        );

        CycleReport {
            state: self.ui.state(),
            transmitted,
            display_refreshed,
            next_deadline: self.next_cycle,
            sleep_duration,
        }
    }

    pub fn context(&self) -> &ControlContext {
        &self.context
    }

    pub fn ui(&self) -> &UiStateMachine {
        &self.ui
    }

    pub fn engine(&self) -> &PatternEngine<MAX_LEDS> {
        &self.engine
    }

    pub fn output(&self) -> &OutputDispatcher<D, W> {
        &self.output
    }
}
