//! # Configuration
//! Timing constants and thresholds of the device. The defaults are what the appliance ships with;
//! tests shorten or tweak single values through struct update syntax.

/// C4 in Hz
pub const NOTE_C4: u32 = 262;
/// D4 in Hz
pub const NOTE_D4: u32 = 294;
/// E4 in Hz
pub const NOTE_E4: u32 = 330;
/// F4 in Hz
pub const NOTE_F4: u32 = 349;
/// G4 in Hz
pub const NOTE_G4: u32 = 392;
/// A4 in Hz
pub const NOTE_A4: u32 = 440;
/// B4 in Hz
pub const NOTE_B4: u32 = 494;
/// C5 in Hz
pub const NOTE_C5: u32 = 523;

/// The ascending scale the alarm plays, looped until dismissed.
pub const ALARM_MELODY: [u32; 8] = [
    NOTE_C4, NOTE_D4, NOTE_E4, NOTE_F4, NOTE_G4, NOTE_A4, NOTE_B4, NOTE_C5,
];

/// India Standard Time, +5:30. No daylight saving.
pub const UTC_OFFSET_SECONDS: i32 = 19_800;

/// An acceptable range for an environment value. Values strictly outside raise a warning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WarningBand {
    /// Below this the value is too low
    pub low: f32,
    /// Above this the value is too high
    pub high: f32,
}

impl WarningBand {
    /// Create a new band
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }
}

/// All tunables of the device in one place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MediboxConfig {
    /// Settle time after a detected press before the reader returns it
    pub debounce_ms: u32,
    /// How often the input reader samples the buttons while waiting
    pub poll_interval_ms: u32,
    /// Length of one note of the alarm melody
    pub note_ms: u32,
    /// Silence between two notes
    pub note_gap_ms: u32,
    /// Frequencies of the alarm melody
    pub melody: [u32; 8],
    /// Stop ringing on its own after this long. `None` rings until Cancel is pressed.
    pub max_ring_ms: Option<u32>,
    /// How long "Time is set" and friends stay on screen
    pub confirmation_ms: u32,
    /// How long the welcome screen stays on screen
    pub splash_ms: u32,
    /// Fixed offset from UTC applied to network time
    pub utc_offset_seconds: i32,
    /// Acceptable temperature in °C
    pub temperature: WarningBand,
    /// Acceptable relative humidity in %
    pub humidity: WarningBand,
}

impl MediboxConfig {
    /// The shipped configuration.
    pub const fn new() -> Self {
        Self {
            debounce_ms: 200,
            poll_interval_ms: 10,
            note_ms: 500,
            note_gap_ms: 2,
            melody: ALARM_MELODY,
            max_ring_ms: None,
            confirmation_ms: 1000,
            splash_ms: 2000,
            utc_offset_seconds: UTC_OFFSET_SECONDS,
            temperature: WarningBand::new(25.0, 35.0),
            humidity: WarningBand::new(20.0, 40.0),
        }
    }
}

impl Default for MediboxConfig {
    fn default() -> Self {
        Self::new()
    }
}
