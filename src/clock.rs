//! # Clock source
//! Wall-clock time as the rest of the device sees it.
//!
//! A [`ClockProvider`] is the black box that actually knows the time (the RP2040 RTC on the
//! device, seeded from network time at startup). [`ClockSource`] sits in front of it and keeps the
//! last good [`ClockTime`], so a failed read never clobbers what the loop already knows.
use crate::error::{Error, Result};
use time::{OffsetDateTime, UtcOffset};

/// The time of day as shown on the screen and compared against alarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    /// Day of the month
    pub day: u8,
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
}

impl ClockTime {
    /// Create a new `ClockTime`
    pub const fn new(day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            day,
            hour,
            minute,
            second,
        }
    }
}

/// Something that can tell the time and be told a new one.
pub trait ClockProvider {
    /// The current time, or [`Error::NoTimeAvailable`] if there is none.
    ///
    /// # Errors
    /// [`Error::NoTimeAvailable`] when the underlying clock is not running or cannot be read.
    fn now(&mut self) -> Result<ClockTime>;

    /// Move the clock to `hour:minute:00`, keeping the date.
    ///
    /// # Errors
    /// [`Error::NoTimeAvailable`] when the underlying clock cannot be read or written.
    fn set_time(&mut self, hour: u8, minute: u8) -> Result<()>;
}

/// Caches the last good reading of a [`ClockProvider`].
pub struct ClockSource<P> {
    /// Where the time comes from
    provider: P,
    /// Last successfully read time
    current: ClockTime,
}

impl<P: ClockProvider> ClockSource<P> {
    /// Create a new `ClockSource`. Until the first successful refresh the time is all zeros.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            current: ClockTime::default(),
        }
    }

    /// Read the provider. On failure the cached time stays as it was and the error is handed
    /// back, there are no retries in here: the next loop iteration is the retry.
    ///
    /// # Errors
    /// Whatever the provider reports, normally [`Error::NoTimeAvailable`].
    pub fn refresh(&mut self) -> Result<ClockTime> {
        let now = self.provider.now()?;
        self.current = now;
        Ok(now)
    }

    /// The last good time
    pub const fn current(&self) -> ClockTime {
        self.current
    }

    /// Set hour and minute on the provider and mirror it in the cache. Seconds restart at zero.
    ///
    /// # Errors
    /// Whatever the provider reports; the cache is left alone in that case.
    pub fn set_time(&mut self, hour: u8, minute: u8) -> Result<()> {
        self.provider.set_time(hour, minute)?;
        self.current.hour = hour;
        self.current.minute = minute;
        self.current.second = 0;
        info!("Clock set to {:02}:{:02}", hour, minute);
        Ok(())
    }

    /// Access the provider, e.g. to seed it from network time
    pub const fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}

/// A full calendar date and time in the local (offset) time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CivilDateTime {
    /// Full year, e.g. 2024
    pub year: u16,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    /// Days since Monday, 0-6
    pub weekday: u8,
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
}

impl CivilDateTime {
    /// Convert seconds since the unix epoch to local time with a fixed offset from UTC.
    ///
    /// # Errors
    /// [`Error::TimeApi`] if the timestamp or the offset is out of range.
    pub fn from_unix(unix_seconds: i64, utc_offset_seconds: i32) -> Result<Self> {
        let offset = UtcOffset::from_whole_seconds(utc_offset_seconds).map_err(|_| Error::TimeApi)?;
        let local = OffsetDateTime::from_unix_timestamp(unix_seconds)
            .map_err(|_| Error::TimeApi)?
            .to_offset(offset);
        let year = u16::try_from(local.year()).map_err(|_| Error::TimeApi)?;

        Ok(Self {
            year,
            month: u8::from(local.month()),
            day: local.day(),
            weekday: local.weekday().number_days_from_monday(),
            hour: local.hour(),
            minute: local.minute(),
            second: local.second(),
        })
    }

    /// The part of the date and time the display and the alarms care about
    pub const fn clock_time(&self) -> ClockTime {
        ClockTime::new(self.day, self.hour, self.minute, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UTC_OFFSET_SECONDS;

    /// Provider that answers from a fixed script
    struct StepProvider {
        /// Next answer
        answer: Result<ClockTime>,
    }

    impl ClockProvider for StepProvider {
        fn now(&mut self) -> Result<ClockTime> {
            self.answer
        }

        fn set_time(&mut self, hour: u8, minute: u8) -> Result<()> {
            let mut time = self.answer?;
            time.hour = hour;
            time.minute = minute;
            time.second = 0;
            self.answer = Ok(time);
            Ok(())
        }
    }

    #[test]
    fn refresh_twice_without_change_is_identical() {
        let mut source = ClockSource::new(StepProvider {
            answer: Ok(ClockTime::new(12, 8, 30, 15)),
        });
        let first = source.refresh();
        let second = source.refresh();
        assert_eq!(first, second);
        assert_eq!(source.current(), ClockTime::new(12, 8, 30, 15));
    }

    #[test]
    fn failed_refresh_keeps_previous_time() {
        let mut source = ClockSource::new(StepProvider {
            answer: Ok(ClockTime::new(3, 22, 10, 5)),
        });
        source.refresh().ok();
        source.provider_mut().answer = Err(Error::NoTimeAvailable);

        assert_eq!(source.refresh(), Err(Error::NoTimeAvailable));
        assert_eq!(source.current(), ClockTime::new(3, 22, 10, 5));
    }

    #[test]
    fn set_time_keeps_day_and_zeroes_seconds() {
        let mut source = ClockSource::new(StepProvider {
            answer: Ok(ClockTime::new(9, 1, 2, 3)),
        });
        source.refresh().ok();
        source.set_time(23, 59).ok();

        assert_eq!(source.current(), ClockTime::new(9, 23, 59, 0));
        assert_eq!(source.refresh(), Ok(ClockTime::new(9, 23, 59, 0)));
    }

    #[test]
    fn set_time_failure_leaves_cache_alone() {
        let mut source = ClockSource::new(StepProvider {
            answer: Err(Error::NoTimeAvailable),
        });
        assert_eq!(source.set_time(5, 5), Err(Error::NoTimeAvailable));
        assert_eq!(source.current(), ClockTime::default());
    }

    #[test]
    fn unix_epoch_in_india() {
        let dt = CivilDateTime::from_unix(0, UTC_OFFSET_SECONDS).unwrap();
        assert_eq!(
            dt,
            CivilDateTime {
                year: 1970,
                month: 1,
                day: 1,
                weekday: 3,
                hour: 5,
                minute: 30,
                second: 0,
            }
        );
    }

    #[test]
    fn offset_rolls_into_next_day_and_year() {
        // 2024-12-31 18:29:59 UTC
        let dt = CivilDateTime::from_unix(1_735_669_799, UTC_OFFSET_SECONDS).unwrap();
        assert_eq!((dt.year, dt.month, dt.day), (2024, 12, 31));
        assert_eq!(dt.clock_time(), ClockTime::new(31, 23, 59, 59));

        let dt = CivilDateTime::from_unix(1_735_669_800, UTC_OFFSET_SECONDS).unwrap();
        assert_eq!((dt.year, dt.month, dt.day, dt.weekday), (2025, 1, 1, 2));
        assert_eq!(dt.clock_time(), ClockTime::new(1, 0, 0, 0));
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        assert_eq!(
            CivilDateTime::from_unix(0, 30 * 3600),
            Err(Error::TimeApi)
        );
    }
}
