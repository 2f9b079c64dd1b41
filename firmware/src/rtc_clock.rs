//! # RTC clock
//! The RP2040 real time clock as the wall clock of the device.
use defmt::{Debug2Format, warn};
use embassy_rp::peripherals::RTC;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};
use medibox::{CivilDateTime, ClockProvider, ClockTime, Error, Result};

/// Clock backed by the on-chip RTC. It only runs once it has been seeded.
pub struct RtcClock {
    /// The peripheral
    rtc: Rtc<'static, RTC>,
}

impl RtcClock {
    /// Create a new `RtcClock`
    pub const fn new(rtc: Rtc<'static, RTC>) -> Self {
        Self { rtc }
    }

    /// Set the full date and time, typically from the network.
    ///
    /// # Errors
    /// [`Error::NoTimeAvailable`] if the RTC rejects the date.
    pub fn seed(&mut self, local: &CivilDateTime) -> Result<()> {
        let dt = DateTime {
            year: local.year,
            month: local.month,
            day: local.day,
            day_of_week: day_of_week(local.weekday),
            hour: local.hour,
            minute: local.minute,
            second: local.second,
        };
        self.rtc.set_datetime(dt).map_err(|e| {
            warn!("Failed to set RTC: {}", Debug2Format(&e));
            Error::NoTimeAvailable
        })
    }
}

/// Map days since Monday to the RTC's weekday
const fn day_of_week(days_from_monday: u8) -> DayOfWeek {
    match days_from_monday {
        0 => DayOfWeek::Monday,
        1 => DayOfWeek::Tuesday,
        2 => DayOfWeek::Wednesday,
        3 => DayOfWeek::Thursday,
        4 => DayOfWeek::Friday,
        5 => DayOfWeek::Saturday,
        _ => DayOfWeek::Sunday,
    }
}

impl ClockProvider for RtcClock {
    fn now(&mut self) -> Result<ClockTime> {
        let dt = self.rtc.now().map_err(|_| Error::NoTimeAvailable)?;
        Ok(ClockTime::new(dt.day, dt.hour, dt.minute, dt.second))
    }

    fn set_time(&mut self, hour: u8, minute: u8) -> Result<()> {
        let mut dt = self.rtc.now().map_err(|_| Error::NoTimeAvailable)?;
        dt.hour = hour;
        dt.minute = minute;
        dt.second = 0;
        self.rtc.set_datetime(dt).map_err(|e| {
            warn!("Failed to set RTC: {}", Debug2Format(&e));
            Error::NoTimeAvailable
        })
    }
}
