//! # Errors
//! One error type for the whole crate. Nothing in here is fatal by itself, the caller decides:
//! a missing time or a failed sensor poll only costs one loop iteration, a display that cannot be
//! initialised halts the firmware.
use derive_more::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can go wrong between the control loop and its peripherals.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The clock provider could not supply a timestamp.
    #[display("time not available")]
    NoTimeAvailable,
    /// The environment sensor did not answer within its protocol timing.
    #[display("sensor timed out")]
    SensorTimeout,
    /// The environment sensor answered, but the frame checksum did not match.
    #[display("sensor checksum mismatch")]
    SensorChecksum,
    /// The text surface rejected a draw or a flush.
    #[display("display write failed")]
    Display,
    /// The time API answered with something we could not turn into a timestamp.
    #[display("time api response not understood")]
    TimeApi,
    /// Wifi, DHCP or HTTP failed while fetching the time.
    #[display("network unavailable")]
    Network,
}
