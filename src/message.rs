//! # Alarm message
//! Decodes the payload a remote user sends to set the alarm.
//!
//! The payload is plain text laid out as `YYYY-MM-DD hh:mm`. Anything after the minute is ignored,
//! so `2025-03-01 07:30 please` sets the alarm just like `2025-03-01 07:30` does. Month and day
//! are not range checked here, they are folded by calendar arithmetic in [`CalendarTimestamp::new`].
use thiserror::Error;

use crate::calendar::CalendarTimestamp;

/// The shortest payload that can hold `YYYY-MM-DD hh:mm`
pub const MIN_PAYLOAD_LEN: usize = 16;

/// Payloads are truncated to this many bytes before they reach the parser
pub const MAX_PAYLOAD_LEN: usize = 63;

/// Why a payload was rejected
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// The payload is too short, does not follow `YYYY-MM-DD hh:mm`, or names a reading outside
    /// the representable calendar range
    #[error("malformed alarm payload")]
    Malformed,
}

/// A separator byte and its position in the payload
const SEPARATORS: [(usize, u8); 4] = [(4, b'-'), (7, b'-'), (10, b' '), (13, b':')];

/// Parse an alarm payload into a naive wall-clock reading
///
/// # Errors
/// [`ParseError::Malformed`] if the payload is shorter than [`MIN_PAYLOAD_LEN`], does not match
/// the layout, or does not describe a representable calendar reading.
pub fn parse_alarm(payload: &[u8]) -> Result<CalendarTimestamp, ParseError> {
    let head = payload
        .get(..MIN_PAYLOAD_LEN)
        .ok_or(ParseError::Malformed)?;

    if !SEPARATORS
        .iter()
        .all(|&(pos, sep)| head.get(pos) == Some(&sep))
    {
        return Err(ParseError::Malformed);
    }

    let year = digits(head, 0, 4)?;
    let month = digits(head, 5, 2)?;
    let day = digits(head, 8, 2)?;
    let hour = digits(head, 11, 2)?;
    let minute = digits(head, 14, 2)?;

    CalendarTimestamp::new(
        year,
        narrow(month)?,
        narrow(day)?,
        narrow(hour)?,
        narrow(minute)?,
    )
    .ok_or(ParseError::Malformed)
}

/// Read `len` ASCII digits starting at `start` as a decimal number
fn digits(bytes: &[u8], start: usize, len: usize) -> Result<u16, ParseError> {
    bytes
        .get(start..start + len)
        .ok_or(ParseError::Malformed)?
        .iter()
        .try_fold(0_u16, |acc, &b| {
            if b.is_ascii_digit() {
                Ok(acc * 10 + u16::from(b - b'0'))
            } else {
                Err(ParseError::Malformed)
            }
        })
}

/// Two digit fields always fit into a byte
fn narrow(value: u16) -> Result<u8, ParseError> {
    u8::try_from(value).map_err(|_| ParseError::Malformed)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_parse_plain() {
        let ts = parse_alarm(b"2025-03-01 07:30").unwrap();
        assert_eq!(ts.civil(), datetime!(2025-03-01 07:30));
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let ts = parse_alarm(b"2025-03-01 07:30xyz").unwrap();
        assert_eq!(ts.civil(), datetime!(2025-03-01 07:30));

        let ts = parse_alarm(b"2025-12-24 18:05\n\xff\xfe").unwrap();
        assert_eq!(ts.civil(), datetime!(2025-12-24 18:05));
    }

    #[test]
    fn test_too_short() {
        assert_eq!(parse_alarm(b""), Err(ParseError::Malformed));
        assert_eq!(parse_alarm(b"bad-data"), Err(ParseError::Malformed));
        assert_eq!(parse_alarm(b"2025-03-01 07:3"), Err(ParseError::Malformed));
    }

    #[test]
    fn test_layout_mismatch() {
        for payload in [
            &b"2025/03/01 07:30"[..],
            b"2025-03-01T07:30",
            b"2025-03-01 07.30",
            b"25-03-01 07:30:00",
            b"2025-3-1 7:30 pm",
            b"20x5-03-01 07:30",
            b"2025-03-01 07:-3",
            b"+025-03-01 07:30",
            b" 2025-03-01 07:30",
        ] {
            assert_eq!(parse_alarm(payload), Err(ParseError::Malformed));
        }
    }

    #[test]
    fn test_out_of_range_fields_are_folded() {
        let ts = parse_alarm(b"2025-13-01 00:00").unwrap();
        assert_eq!(ts.month(), 13);
        assert_eq!(ts.civil(), datetime!(2026-01-01 00:00));

        let ts = parse_alarm(b"2025-02-31 99:99").unwrap();
        assert_eq!(ts.civil(), datetime!(2025-03-07 04:39));
    }

    #[test]
    fn test_unrepresentable_reading() {
        assert_eq!(parse_alarm(b"9999-99-99 99:99"), Err(ParseError::Malformed));
    }
}
