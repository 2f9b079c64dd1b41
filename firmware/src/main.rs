//! # Medibox firmware
//! Raspberry Pi Pico W build of the Medibox medication reminder.
//!
//! Startup brings up the display, seeds the RTC from network time and shows the welcome screen;
//! after that the control loop of the `medibox` crate owns every peripheral and runs forever.
#![no_std]
#![no_main]

use crate::display::OledSurface;
use crate::dht11::Dht11;
// the struct names are needed by split_resources!
use crate::resources::{
    AssignedResources, ButtonResources, BuzzerResources, DisplayResources, IndicatorResources,
    RtcResources, SensorResources, WifiResources,
};
use crate::rtc_clock::RtcClock;
use crate::sound::PwmBuzzer;
use crate::time_updater::TimeUpdater;
use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Flex, Input, Level, Output, Pull};
use embassy_rp::rtc::Rtc;
use embassy_time::{Duration, Timer};
use embedded_hal_async::delay::DelayNs;
use medibox::{ButtonPins, Hardware, Medibox, MediboxConfig};
use {defmt_rtt as _, panic_probe as _};

mod dht11;
mod display;
mod resources;
mod rtc_clock;
mod sound;
mod time_updater;

/// Delay on the embassy timer queue that can be handed to several owners
#[derive(Clone, Copy)]
struct TimerDelay;

impl DelayNs for TimerDelay {
    async fn delay_ns(&mut self, ns: u32) {
        Timer::after(Duration::from_nanos(u64::from(ns))).await;
    }

    async fn delay_us(&mut self, us: u32) {
        Timer::after_micros(u64::from(us)).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        Timer::after_millis(u64::from(ms)).await;
    }
}

/// Pulled-up inputs for the four buttons
fn buttons(r: ButtonResources) -> ButtonPins<Input<'static>> {
    ButtonPins {
        up: Input::new(r.up, Pull::Up),
        down: Input::new(r.down, Pull::Up),
        ok: Input::new(r.ok, Pull::Up),
        cancel: Input::new(r.cancel, Pull::Up),
    }
}

/// The alarm LED, off
fn indicator(r: IndicatorResources) -> Output<'static> {
    Output::new(r.led, Level::Low)
}

/// The DHT11 data line
fn sensor(r: SensorResources) -> Dht11 {
    Dht11::new(Flex::new(r.data))
}

/// The RTC, not running until it is seeded
fn clock(r: RtcResources) -> RtcClock {
    RtcClock::new(Rtc::new(r.rtc_inst))
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Program start");

    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);
    let config = MediboxConfig::new();

    // nothing works without a screen
    let mut surface = match OledSurface::init(r.display).await {
        Ok(surface) => surface,
        Err(e) => {
            error!("Display not available, halting: {}", e);
            loop {
                Timer::after_secs(3600).await;
            }
        }
    };

    let mut clock = clock(r.rtc);
    TimeUpdater::new(config.utc_offset_seconds)
        .sync(spawner, r.wifi, &mut surface, &mut clock)
        .await;

    let hardware = Hardware {
        clock,
        surface,
        buttons: buttons(r.buttons),
        tone: PwmBuzzer::new(r.buzzer),
        indicator: indicator(r.indicator),
        sensor: sensor(r.sensor),
    };
    let mut medibox = Medibox::new(hardware, TimerDelay, config);
    medibox.welcome().await;
    medibox.run().await
}
