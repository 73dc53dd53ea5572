//! # Time API
//! Decodes the response of the world time HTTP API the firmware syncs its clock from.
//!
//! A response looks like this, only `unixtime`, `raw_offset` and `dst_offset` are read:
//! ```json
//! {
//!     "datetime": "2025-03-01T08:30:00.123456+01:00",
//!     "day_of_week": 6,
//!     "dst": false,
//!     "dst_offset": 0,
//!     "raw_offset": 3600,
//!     "timezone": "Europe/Berlin",
//!     "unixtime": 1740814200
//! }
//! ```
use serde::Deserialize;
use thiserror::Error;
use time::UtcOffset;

use crate::calendar::UnixSeconds;
use crate::clock::ClockReading;

/// Why a response could not be used
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeApiError {
    /// The body is not the expected JSON object
    #[error("time API response is not valid JSON")]
    Json,
    /// The reported offset is not a valid UTC offset
    #[error("time API reported an invalid UTC offset")]
    Offset,
}

/// The fields of the response we need
#[derive(Deserialize)]
struct ApiResponse {
    /// Seconds since the epoch
    unixtime: i64,
    /// Standard offset of the zone in seconds
    raw_offset: i32,
    /// Additional daylight saving offset in seconds
    dst_offset: i32,
}

/// Parse a time API response body into a clock reading
///
/// # Errors
/// [`TimeApiError::Json`] if the body cannot be decoded, [`TimeApiError::Offset`] if the combined
/// offset is out of range.
pub fn parse_time_api_response(body: &[u8]) -> Result<ClockReading, TimeApiError> {
    let (response, _used) = serde_json_core::de::from_slice::<ApiResponse>(body).map_err(|_| {
        warn!("Failed to parse time API response");
        TimeApiError::Json
    })?;

    let offset = response
        .raw_offset
        .checked_add(response.dst_offset)
        .and_then(|secs| UtcOffset::from_whole_seconds(secs).ok())
        .ok_or(TimeApiError::Offset)?;

    Ok(ClockReading {
        now: UnixSeconds(response.unixtime),
        offset,
    })
}
