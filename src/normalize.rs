//! # Time normalization
//! Turns a naive wall-clock reading into an absolute instant.
//!
//! The local offset is the one in effect at the reference instant (usually "now"), not the one
//! in effect at the converted reading. An alarm set across a daylight saving change therefore
//! fires one offset step early or late.
use time::Duration;

use crate::calendar::{CalendarSource, CalendarTimestamp, UnixSeconds};

/// The offset of the local calendar from UTC at `reference_now`, derived by rendering the same
/// instant in both calendars. Zero if the instant cannot be rendered.
pub fn local_offset<C: CalendarSource + ?Sized>(
    calendar: &C,
    reference_now: UnixSeconds,
) -> Duration {
    match (
        calendar.render_local(reference_now),
        calendar.render_utc(reference_now),
    ) {
        (Some(local), Some(utc)) => local - utc,
        _ => Duration::ZERO,
    }
}

/// Interpret `naive` as a local wall-clock reading and convert it to an instant, using the local
/// offset in effect at `reference_now`.
pub fn to_instant<C: CalendarSource + ?Sized>(
    naive: &CalendarTimestamp,
    reference_now: UnixSeconds,
    calendar: &C,
) -> UnixSeconds {
    let offset = local_offset(calendar, reference_now);
    UnixSeconds(naive.civil_seconds().saturating_sub(offset.whole_seconds()))
}
