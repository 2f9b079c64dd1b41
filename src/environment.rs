//! # Environment
//! Temperature and humidity of the place the medicine is stored, and the warnings derived from
//! them.
//!
//! A sensor error is not a warning: if there is no reading this cycle, nothing is shown and the
//! next cycle polls again.
use crate::config::{MediboxConfig, WarningBand};
use crate::display::{Placement, TextSurface};
use crate::error::{Error, Result};

/// One sample of the environment sensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Degrees Celsius
    pub temperature: f32,
    /// Relative humidity in percent
    pub humidity: f32,
}

impl Reading {
    /// Create a new `Reading`
    pub const fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// Decode the five bytes a DHT11 sends: humidity integral and decimal part, temperature
    /// integral and decimal part, checksum. Bit 7 of the temperature decimal byte marks a
    /// negative temperature.
    ///
    /// # Errors
    /// [`Error::SensorChecksum`] if the last byte is not the low byte of the sum of the others.
    pub fn from_dht11_frame(frame: [u8; 5]) -> Result<Self> {
        let sum = frame[..4]
            .iter()
            .fold(0_u8, |sum, &byte| sum.wrapping_add(byte));
        if sum != frame[4] {
            return Err(Error::SensorChecksum);
        }

        let humidity = f32::from(frame[0]) + f32::from(frame[1]) / 10.0;
        let magnitude = f32::from(frame[2]) + f32::from(frame[3] & 0x7F) / 10.0;
        let temperature = if frame[3] & 0x80 == 0 {
            magnitude
        } else {
            -magnitude
        };
        Ok(Self::new(temperature, humidity))
    }
}

/// Something that measures temperature and humidity.
#[allow(async_fn_in_trait)]
pub trait EnvironmentSensor {
    /// Take a reading.
    ///
    /// # Errors
    /// [`Error::SensorTimeout`] or [`Error::SensorChecksum`] if the sensor does not deliver.
    async fn poll(&mut self) -> Result<Reading>;
}

/// Where a value sits relative to its acceptable band
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Strictly above the band
    High,
    /// Strictly below the band
    Low,
}

impl Level {
    /// Compare a value against a band. Values on the edges are fine.
    pub fn of(value: f32, band: WarningBand) -> Option<Self> {
        if value > band.high {
            Some(Self::High)
        } else if value < band.low {
            Some(Self::Low)
        } else {
            None
        }
    }
}

/// The warnings one reading raises, at most one per quantity.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvironmentWarnings {
    /// Temperature outside its band
    pub temperature: Option<Level>,
    /// Humidity outside its band
    pub humidity: Option<Level>,
}

impl EnvironmentWarnings {
    /// Evaluate a reading against the configured bands
    pub fn evaluate(reading: Reading, config: &MediboxConfig) -> Self {
        Self {
            temperature: Level::of(reading.temperature, config.temperature),
            humidity: Level::of(reading.humidity, config.humidity),
        }
    }

    /// Is everything within range
    pub const fn is_clear(&self) -> bool {
        self.temperature.is_none() && self.humidity.is_none()
    }

    /// The temperature line to show, if any
    pub const fn temperature_text(&self) -> Option<&'static str> {
        match self.temperature {
            Some(Level::High) => Some("HIGH TEMPERATURE"),
            Some(Level::Low) => Some("LOW TEMPERATURE"),
            None => None,
        }
    }

    /// The humidity line to show, if any
    pub const fn humidity_text(&self) -> Option<&'static str> {
        match self.humidity {
            Some(Level::High) => Some("HIGH HUMIDITY"),
            Some(Level::Low) => Some("LOW HUMIDITY"),
            None => None,
        }
    }

    /// Print the warnings on their lines, leaving the rest of the screen alone
    ///
    /// # Errors
    /// [`Error::Display`] if the surface rejects a print.
    pub async fn render<S: TextSurface>(&self, surface: &mut S) -> Result<()> {
        if let Some(text) = self.temperature_text() {
            surface.print_at(text, Placement::TEMPERATURE_WARNING).await?;
        }
        if let Some(text) = self.humidity_text() {
            surface.print_at(text, Placement::HUMIDITY_WARNING).await?;
        }
        Ok(())
    }
}
