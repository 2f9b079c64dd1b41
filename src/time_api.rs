//! # Time API
//! Parsing of the HTTP time API answer the firmware fetches once at startup.
//!
//! The API answers with a JSON object; only its `unixtime` field is used, everything else in the
//! object is skipped. The time zone is not taken from the answer but from the fixed offset in
//! [`MediboxConfig`](crate::config::MediboxConfig).
use crate::clock::CivilDateTime;
use crate::error::{Error, Result};
use serde::Deserialize;

/// The part of the API response we care about
#[derive(Deserialize)]
struct ApiResponse {
    /// Seconds since the unix epoch, UTC
    unixtime: i64,
}

/// Extract the unix time from a response body.
///
/// # Errors
/// [`Error::TimeApi`] if the body is not a JSON object with an integer `unixtime` field.
pub fn parse_unix_time(body: &[u8]) -> Result<i64> {
    match serde_json_core::de::from_slice::<ApiResponse>(body) {
        Ok((response, _used)) => Ok(response.unixtime),
        Err(_) => {
            warn!("Failed to parse time api response");
            Err(Error::TimeApi)
        }
    }
}

/// Parse a response body and convert it to local time.
///
/// # Errors
/// [`Error::TimeApi`] if the body cannot be parsed or the time is out of range.
pub fn parse_local_time(body: &[u8], utc_offset_seconds: i32) -> Result<CivilDateTime> {
    let unix = parse_unix_time(body)?;
    let local = CivilDateTime::from_unix(unix, utc_offset_seconds)?;
    info!(
        "Time api says {}-{:02}-{:02} {:02}:{:02}:{:02}",
        local.year,
        local.month,
        local.day,
        local.hour,
        local.minute,
        local.second
    );
    Ok(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UTC_OFFSET_SECONDS;

    #[test]
    fn reads_unixtime_and_skips_the_rest() {
        let body = br#"{"abbreviation":"IST","day_of_week":2,"dst":false,"unixtime":1735669800,"utc_offset":"+05:30","week_number":1}"#;
        assert_eq!(parse_unix_time(body), Ok(1_735_669_800));
    }

    #[test]
    fn missing_field_is_an_error() {
        assert_eq!(parse_unix_time(br#"{"datetime":"now"}"#), Err(Error::TimeApi));
        assert_eq!(parse_unix_time(b"Service Unavailable"), Err(Error::TimeApi));
        assert_eq!(parse_unix_time(br#"{"unixtime":"soon"}"#), Err(Error::TimeApi));
    }

    #[test]
    fn converts_to_local_time() {
        let local = parse_local_time(br#"{"unixtime":1735669800}"#, UTC_OFFSET_SECONDS).unwrap();
        assert_eq!((local.year, local.month, local.day), (2025, 1, 1));
        assert_eq!((local.hour, local.minute, local.second), (0, 0, 0));
    }
}
