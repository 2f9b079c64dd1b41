//! # Sound
//! Passive buzzer on a PWM slice, driven at 50 % duty.
use crate::resources::BuzzerResources;
use defmt::{debug, warn};
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use medibox::ToneOutput;

/// Largest value of the 16 bit PWM counter
const MAX_TOP: u32 = 0xFFFF;

/// The buzzer. The pin is channel B of its slice.
pub struct PwmBuzzer {
    /// The slice driving the pin
    pwm: Pwm<'static>,
    /// Current configuration, re-applied on every change
    config: Config,
}

impl PwmBuzzer {
    /// Create a new silent `PwmBuzzer`
    pub fn new(r: BuzzerResources) -> Self {
        let mut config = Config::default();
        config.compare_b = 0;
        let pwm = Pwm::new_output_b(r.slice, r.pin, config.clone());
        Self { pwm, config }
    }
}

impl ToneOutput for PwmBuzzer {
    fn set_tone(&mut self, frequency_hz: u32) {
        if frequency_hz == 0 {
            self.stop_tone();
            return;
        }
        // smallest integer divider that keeps the counter within 16 bits
        let clock = clk_sys_freq();
        let divider = (clock / frequency_hz / (MAX_TOP + 1) + 1).clamp(1, 255);
        let top = clock / divider / frequency_hz - 1;
        let Ok(top) = u16::try_from(top) else {
            warn!("Tone {} Hz out of range", frequency_hz);
            self.stop_tone();
            return;
        };
        debug!("Tone {} Hz: divider {}, top {}", frequency_hz, divider, top);

        #[allow(clippy::cast_possible_truncation)] // clamped to 255 above
        {
            self.config.divider = (divider as u8).into();
        }
        self.config.top = top;
        self.config.compare_b = top / 2;
        self.pwm.set_config(&self.config);
    }

    fn stop_tone(&mut self) {
        self.config.compare_b = 0;
        self.pwm.set_config(&self.config);
    }
}
