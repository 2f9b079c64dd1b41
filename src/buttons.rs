//! # Buttons
//! The four buttons of the device and the reader that waits for them.
//!
//! The buttons are plain active-low inputs that are polled, there are no interrupts and no queue.
//! A press that happens while nobody is looking is simply lost, which is fine for one user
//! pressing one button at a time.
use crate::config::MediboxConfig;
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

/// The buttons of the system
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Right button, increments and moves forward
    Up,
    /// Left button, decrements and moves back
    Down,
    /// Middle button, enters and confirms
    Ok,
    /// Leaves menus, aborts edits and silences the alarm
    Cancel,
}

/// The order in which the buttons are sampled; when several are held the first one wins.
const SCAN_ORDER: [Button; 4] = [Button::Down, Button::Ok, Button::Up, Button::Cancel];

/// The input pins of the four buttons
pub struct ButtonPins<P> {
    /// Pin of the up button
    pub up: P,
    /// Pin of the down button
    pub down: P,
    /// Pin of the ok button
    pub ok: P,
    /// Pin of the cancel button
    pub cancel: P,
}

/// Polls the buttons and debounces presses.
pub struct InputReader<P, D> {
    /// The button inputs
    pins: ButtonPins<P>,
    /// Used for the debounce settle time and between polls
    delay: D,
    /// The debounce duration
    debounce_ms: u32,
    /// Time between two samples while waiting
    poll_interval_ms: u32,
}

impl<P: InputPin, D: DelayNs> InputReader<P, D> {
    /// Create a new `InputReader`
    pub const fn new(pins: ButtonPins<P>, delay: D, config: &MediboxConfig) -> Self {
        Self {
            pins,
            delay,
            debounce_ms: config.debounce_ms,
            poll_interval_ms: config.poll_interval_ms,
        }
    }

    /// Sample one button right now. A pin that cannot be read counts as released.
    pub fn is_pressed(&mut self, button: Button) -> bool {
        let pin = match button {
            Button::Up => &mut self.pins.up,
            Button::Down => &mut self.pins.down,
            Button::Ok => &mut self.pins.ok,
            Button::Cancel => &mut self.pins.cancel,
        };
        match pin.is_low() {
            Ok(pressed) => pressed,
            Err(_) => {
                warn!("Failed to read {} button", button);
                false
            }
        }
    }

    /// Sample all buttons once and return the first one that is held
    pub fn first_pressed(&mut self) -> Option<Button> {
        SCAN_ORDER.into_iter().find(|&button| self.is_pressed(button))
    }

    /// Ignore the inputs for the settle time, so the contact bounce of the press just seen is
    /// not read as another press.
    pub async fn debounce(&mut self) {
        self.delay.delay_ms(self.debounce_ms).await;
    }

    /// Wait until a button is pressed and return it after the debounce settle time.
    ///
    /// Between two samples `on_tick` runs once, that is how the caller keeps the clock fresh
    /// while the user takes their time in a menu.
    pub async fn wait_for_press<F: FnMut()>(&mut self, mut on_tick: F) -> Button {
        loop {
            if let Some(button) = self.first_pressed() {
                debug!("{} pressed", button);
                self.debounce().await;
                return button;
            }
            on_tick();
            self.delay.delay_ms(self.poll_interval_ms).await;
        }
    }
}
