//! # DHT11
//! Bit-banged driver for the DHT11 temperature and humidity sensor on a single data pin.
//!
//! A transfer starts with the host pulling the line low for 20 ms. The sensor answers with an
//! 80 µs low and 80 µs high phase, then sends 40 bits: each bit is a ~50 µs low phase followed
//! by a high phase of ~27 µs (zero) or ~70 µs (one).
use defmt::{debug, warn};
use embassy_rp::gpio::{Flex, Level, Pull};
use embassy_time::{Duration, Instant, Timer};
use medibox::{EnvironmentSensor, Error, Reading, Result};

/// A high phase longer than this is a one
const ONE_THRESHOLD_US: u64 = 40;
/// Any phase longer than this means the sensor is gone
const PHASE_TIMEOUT_US: u64 = 100;
/// The sensor cannot be read more often than this
const MIN_INTERVAL: Duration = Duration::from_secs(2);

/// DHT11 on a flex pin with the data line pulled up.
pub struct Dht11 {
    /// Data line, switched between output and input
    pin: Flex<'static>,
    /// Outcome of the last transfer and when it ran
    cached: Option<(Instant, Result<Reading>)>,
}

impl Dht11 {
    /// Create a new `Dht11`. The line idles high.
    pub fn new(mut pin: Flex<'static>) -> Self {
        pin.set_pull(Pull::Up);
        pin.set_as_input();
        Self { pin, cached: None }
    }

    /// Wait while the line is at `level`, returning how long that took
    fn wait_while(&mut self, level: Level) -> Result<u64> {
        let start = Instant::now();
        while self.pin.get_level() == level {
            if start.elapsed().as_micros() > PHASE_TIMEOUT_US {
                return Err(Error::SensorTimeout);
            }
        }
        Ok(start.elapsed().as_micros())
    }

    /// Run one transfer and return the raw frame
    async fn read_frame(&mut self) -> Result<[u8; 5]> {
        self.pin.set_as_output();
        self.pin.set_low();
        Timer::after_millis(20).await;
        self.pin.set_high();
        self.pin.set_as_input();

        // the sensor takes 20-40 µs to pull the line down, then answers low and high
        self.wait_while(Level::High)?;
        self.wait_while(Level::Low)?;
        self.wait_while(Level::High)?;

        let mut frame = [0_u8; 5];
        for bit in 0..40 {
            self.wait_while(Level::Low)?;
            let high_us = self.wait_while(Level::High)?;
            if high_us > ONE_THRESHOLD_US {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }
}

impl EnvironmentSensor for Dht11 {
    async fn poll(&mut self) -> Result<Reading> {
        // failures are cached too, a missing sensor must not stall every loop iteration
        if let Some((taken, result)) = self.cached
            && taken.elapsed() < MIN_INTERVAL
        {
            return result;
        }

        let result = self.read_frame().await.and_then(Reading::from_dht11_frame);
        match result {
            Ok(reading) => debug!("DHT11: {}", reading),
            Err(e) => warn!("DHT11 read failed: {}", e),
        }
        self.cached = Some((Instant::now(), result));
        result
    }
}
