//! # Medibox
//! Core of a single-device medication reminder: it keeps wall-clock time, rings up to three alarms,
//! runs a four-button settings menu and warns about the storage climate.
//!
//! Everything in here is written against traits (`embedded-hal` pins and delays plus the small
//! [`ClockProvider`], [`TextSurface`], [`ToneOutput`] and [`EnvironmentSensor`] seams), so the same
//! control loop runs on the RP2040 firmware and under host tests with fakes.
//!
//! The system is one cooperative thread of control: whoever is awaited owns the display, the
//! buzzer and the buttons until it returns.
#![no_std]

// must come first, the logging macros are textually scoped
mod fmt;

pub mod buttons;
pub mod clock;
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod menu;
pub mod orchestrate;
pub mod sound;
pub mod state;
pub mod time_api;
pub mod utility;

#[cfg(test)]
mod testing;

pub use buttons::{Button, ButtonPins, InputReader};
pub use clock::{CivilDateTime, ClockProvider, ClockSource, ClockTime};
pub use config::{MediboxConfig, WarningBand};
pub use display::{FontSize, Placement, TextSurface, draw_text};
pub use environment::{EnvironmentSensor, EnvironmentWarnings, Reading};
pub use error::{Error, Result};
pub use menu::{EditTarget, MenuAction, MenuCursor, MenuEffect, MenuEngine, MenuState};
pub use orchestrate::{Hardware, Medibox};
pub use sound::{AlarmRinger, RingOutcome, ToneOutput};
pub use state::{Alarm, AlarmRegistry, AlarmSlot, SystemState};
