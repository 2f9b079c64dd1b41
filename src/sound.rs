//! # Sound
//! The alarm: a looping scale on the buzzer and the indicator LED, until somebody presses Cancel.
//!
//! Ringing blocks the whole device. The Cancel button is sampled before every note and every few
//! milliseconds while a note plays, so dismissing never takes longer than one note.
use crate::buttons::{Button, InputReader};
use crate::config::MediboxConfig;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

/// A buzzer that can play one square wave tone at a time.
pub trait ToneOutput {
    /// Start a tone, replacing the one that is playing
    fn set_tone(&mut self, frequency_hz: u32);
    /// Silence
    fn stop_tone(&mut self);
}

/// Why the alarm stopped ringing
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RingOutcome {
    /// Cancel was pressed
    Dismissed,
    /// The configured maximum ring time ran out
    TimedOut,
}

/// Plays the alarm melody and drives the indicator LED.
pub struct AlarmRinger<T, L, D> {
    /// The buzzer
    tone: T,
    /// LED that is lit while the alarm rings
    indicator: L,
    /// Times the notes
    delay: D,
    /// Frequencies played in a loop
    melody: [u32; 8],
    /// Length of one note
    note_ms: u32,
    /// Silence after each note
    note_gap_ms: u32,
    /// How often Cancel is sampled while a note plays
    poll_interval_ms: u32,
    /// Give up after this long, `None` rings forever
    max_ring_ms: Option<u32>,
}

impl<T: ToneOutput, L: OutputPin, D: DelayNs> AlarmRinger<T, L, D> {
    /// Create a new `AlarmRinger`. The buzzer and the LED are switched off.
    pub fn new(mut tone: T, mut indicator: L, delay: D, config: &MediboxConfig) -> Self {
        tone.stop_tone();
        if indicator.set_low().is_err() {
            warn!("Failed to switch off the indicator");
        }
        Self {
            tone,
            indicator,
            delay,
            melody: config.melody,
            note_ms: config.note_ms,
            note_gap_ms: config.note_gap_ms,
            poll_interval_ms: config.poll_interval_ms.max(1),
            max_ring_ms: config.max_ring_ms,
        }
    }

    /// Ring until Cancel is pressed or the maximum ring time is over.
    ///
    /// The indicator is on for as long as this runs and the buzzer is silent when it returns.
    /// A dismissing press is debounced before returning, so it does not leak into whatever reads
    /// the buttons next.
    pub async fn ring<P: InputPin, DI: DelayNs>(
        &mut self,
        input: &mut InputReader<P, DI>,
    ) -> RingOutcome {
        info!("Alarm ringing");
        self.set_indicator(true);

        let melody = self.melody;
        let mut rung_ms: u32 = 0;
        let outcome = 'ring: loop {
            for note in melody {
                if input.is_pressed(Button::Cancel) {
                    break 'ring RingOutcome::Dismissed;
                }
                if self.max_ring_ms.is_some_and(|max| rung_ms >= max) {
                    break 'ring RingOutcome::TimedOut;
                }

                self.tone.set_tone(note);
                let mut played_ms = 0;
                while played_ms < self.note_ms {
                    let slice = self.poll_interval_ms.min(self.note_ms - played_ms);
                    self.delay.delay_ms(slice).await;
                    played_ms += slice;
                    if input.is_pressed(Button::Cancel) {
                        self.tone.stop_tone();
                        break 'ring RingOutcome::Dismissed;
                    }
                }
                self.tone.stop_tone();
                self.delay.delay_ms(self.note_gap_ms).await;
                rung_ms = rung_ms.saturating_add(self.note_ms + self.note_gap_ms);
            }
        };

        self.tone.stop_tone();
        self.set_indicator(false);
        match outcome {
            RingOutcome::Dismissed => {
                info!("Alarm dismissed");
                input.debounce().await;
            }
            RingOutcome::TimedOut => info!("Alarm stopped after {} ms", rung_ms),
        }
        outcome
    }

    /// Switch the indicator LED
    fn set_indicator(&mut self, on: bool) {
        let result = if on {
            self.indicator.set_high()
        } else {
            self.indicator.set_low()
        };
        if result.is_err() {
            warn!("Failed to switch the indicator");
        }
    }
}
