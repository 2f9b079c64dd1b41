//! # Orchestrate
//! The main control loop of the device.
//!
//! One iteration refreshes the clock and shows it, rings every alarm that is due, runs the menu
//! if Ok is held and finally shows the environment warnings. Whatever runs owns the display, the
//! buzzer and the buttons until it returns, so there are no locks and no signals: a long menu
//! session simply delays everything else.
use crate::buttons::{Button, ButtonPins, InputReader};
use crate::clock::{ClockProvider, ClockSource, ClockTime};
use crate::config::MediboxConfig;
use crate::display::{Placement, TextSurface};
use crate::environment::{EnvironmentSensor, EnvironmentWarnings};
use crate::menu::{MenuEffect, MenuEngine};
use crate::sound::{AlarmRinger, ToneOutput};
use crate::state::SystemState;
use crate::utility::string_utils::StringUtils;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

/// Shown instead of the time when the clock cannot be read
const NO_TIME_NOTICE: &str = "Failed to obtain time";
/// Shown while an alarm rings
const RINGING_NOTICE: &str = "MEDICINE TIME!";
/// Shown once after startup
const WELCOME: &str = "Welcome to Medibox";

/// The peripherals the control loop runs on
pub struct Hardware<C, S, P, T, L, E> {
    /// Wall clock
    pub clock: C,
    /// The screen
    pub surface: S,
    /// The four buttons
    pub buttons: ButtonPins<P>,
    /// Buzzer
    pub tone: T,
    /// LED lit while an alarm rings
    pub indicator: L,
    /// Temperature and humidity sensor
    pub sensor: E,
}

/// The medication reminder: owns all peripherals and all state.
pub struct Medibox<C, S, P, T, L, E, D> {
    /// Cached wall clock
    clock: ClockSource<C>,
    /// The screen
    surface: S,
    /// The buttons
    input: InputReader<P, D>,
    /// Buzzer and indicator
    ringer: AlarmRinger<T, L, D>,
    /// Temperature and humidity sensor
    sensor: E,
    /// Confirmation dwell and the pause between iterations
    delay: D,
    /// The settings menu
    menu: MenuEngine,
    /// Alarms and menu cursor
    state: SystemState,
    /// Timings and thresholds
    config: MediboxConfig,
}

impl<C, S, P, T, L, E, D> Medibox<C, S, P, T, L, E, D>
where
    C: ClockProvider,
    S: TextSurface,
    P: InputPin,
    T: ToneOutput,
    L: OutputPin,
    E: EnvironmentSensor,
    D: DelayNs + Clone,
{
    /// Create a new `Medibox` with the default alarms
    pub fn new(hardware: Hardware<C, S, P, T, L, E>, delay: D, config: MediboxConfig) -> Self {
        Self {
            clock: ClockSource::new(hardware.clock),
            surface: hardware.surface,
            input: InputReader::new(hardware.buttons, delay.clone(), &config),
            ringer: AlarmRinger::new(hardware.tone, hardware.indicator, delay.clone(), &config),
            sensor: hardware.sensor,
            delay,
            menu: MenuEngine::new(),
            state: SystemState::default(),
            config,
        }
    }

    /// Start from a given state instead of the defaults
    #[must_use]
    pub fn with_state(mut self, state: SystemState) -> Self {
        self.state = state;
        self
    }

    /// Alarms and menu cursor
    pub const fn state(&self) -> &SystemState {
        &self.state
    }

    /// The cached wall clock
    pub const fn clock(&self) -> &ClockSource<C> {
        &self.clock
    }

    /// The menu
    pub const fn menu(&self) -> &MenuEngine {
        &self.menu
    }

    /// Show the welcome screen for the splash dwell, then blank the screen
    pub async fn welcome(&mut self) {
        self.show(WELCOME, Placement::SPLASH).await;
        self.delay.delay_ms(self.config.splash_ms).await;
        self.clear().await;
    }

    /// Run the control loop forever
    pub async fn run(&mut self) -> ! {
        info!("Entering main loop");
        loop {
            self.tick().await;
        }
    }

    /// One iteration of the control loop.
    pub async fn tick(&mut self) {
        match self.clock.refresh() {
            Ok(now) => {
                self.show(&StringUtils::clock_to_str(now), Placement::TIME)
                    .await;
                self.ring_due_alarms(now).await;
            }
            Err(e) => {
                // the alarms are not checked against a stale time
                warn!("Clock not available: {}", e);
                self.show(NO_TIME_NOTICE, Placement::STATUS).await;
            }
        }

        if self.input.is_pressed(Button::Ok) {
            self.input.debounce().await;
            self.run_menu().await;
        }

        self.check_environment().await;

        // hand the executor back for a moment
        self.delay.delay_ms(self.config.poll_interval_ms).await;
    }

    /// Ring each due alarm in turn and latch it
    async fn ring_due_alarms(&mut self, now: ClockTime) {
        for slot in self.state.alarms.due_alarms(now) {
            info!(
                "Alarm {} due at {:02}:{:02}",
                slot.number(),
                now.hour,
                now.minute
            );
            self.show(RINGING_NOTICE, Placement::RINGING).await;
            let outcome = self.ringer.ring(&mut self.input).await;
            debug!("Alarm {} ended: {}", slot.number(), outcome);
            self.state.alarms.mark_triggered(slot);
            self.clear().await;
        }
    }

    /// Run a menu session until the menu is left
    async fn run_menu(&mut self) {
        self.menu.enter();
        loop {
            if let Some(line) = self.menu.screen(&self.state) {
                self.show(&line, Placement::MENU).await;
            }

            let clock = &mut self.clock;
            let button = self
                .input
                .wait_for_press(|| {
                    // failures are reported by the main loop, here the clock just stays behind
                    let _ = clock.refresh();
                })
                .await;

            let effect = self.menu.handle(button, &mut self.state, self.clock.current());
            if effect.is_exit() {
                self.leave_menu(effect).await;
                return;
            }
        }
    }

    /// Apply what the menu decided and show the confirmation
    async fn leave_menu(&mut self, effect: MenuEffect) {
        if let MenuEffect::SetClock { hour, minute } = effect {
            if let Err(e) = self.clock.set_time(hour, minute) {
                error!("Failed to set the clock: {}", e);
                self.clear().await;
                return;
            }
        }

        match effect.confirmation() {
            Some(text) => {
                self.show(text, Placement::CONFIRMATION).await;
                self.delay.delay_ms(self.config.confirmation_ms).await;
                self.clear().await;
            }
            None => self.clear().await,
        }
        info!("Menu closed");
    }

    /// Poll the sensor and print the warnings below the time
    async fn check_environment(&mut self) {
        match self.sensor.poll().await {
            Ok(reading) => {
                let warnings = EnvironmentWarnings::evaluate(reading, &self.config);
                if !warnings.is_clear() {
                    debug!("Environment out of range: {}", reading);
                }
                if let Err(e) = warnings.render(&mut self.surface).await {
                    warn!("Failed to show warnings: {}", e);
                }
            }
            Err(e) => debug!("No environment reading: {}", e),
        }
    }

    /// Clear the screen and print one line, logging instead of failing
    async fn show(&mut self, text: &str, placement: Placement) {
        if let Err(e) = self.surface.show(text, placement).await {
            warn!("Failed to show {}: {}", text, e);
        }
    }

    /// Clear the screen, logging instead of failing
    async fn clear(&mut self) {
        if let Err(e) = self.surface.clear().await {
            warn!("Failed to clear the screen: {}", e);
        }
    }
}
