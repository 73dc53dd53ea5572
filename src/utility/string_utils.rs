//! # StringUtils
//! This module contains utility functions around string handling that are used in the project.
//! All strings are fixed capacity, sized for the longest line they can hold.

use core::fmt::Write;
use heapless::String;
use time::PrimitiveDateTime;

use crate::message::MAX_PAYLOAD_LEN;

/// Width of a text line on the 128 pixel wide display with a 6 pixel font
pub const LINE_WIDTH: usize = 21;

/// Formatting helpers for the display and the log
pub struct StringUtils;

impl StringUtils {
    /// Format the time of day on a 12 hour clock, `"hh:mm:ss AM"` or `"hh:mm:ss PM"`.
    /// Midnight and noon are shown as 12.
    pub fn format_clock_time(dt: &PrimitiveDateTime) -> String<11> {
        let hour12 = match dt.hour() % 12 {
            0 => 12,
            h => h,
        };
        let meridiem = if dt.hour() >= 12 { "PM" } else { "AM" };

        let mut s: String<11> = String::new();
        let _ = write!(
            s,
            "{:02}:{:02}:{:02} {}",
            hour12,
            dt.minute(),
            dt.second(),
            meridiem
        );
        s
    }

    /// Format the alarm line. The target is shown in the UTC calendar and labelled as such,
    /// one example being `"ALARM: 2025-03-01 07:30 UTC"`.
    pub fn format_alarm_line(target: Option<&PrimitiveDateTime>) -> String<32> {
        let mut s: String<32> = String::new();
        let _ = match target {
            Some(dt) => write!(
                s,
                "ALARM: {:04}-{:02}-{:02} {:02}:{:02} UTC",
                dt.year(),
                u8::from(dt.month()),
                dt.day(),
                dt.hour(),
                dt.minute()
            ),
            None => write!(s, "ALARM: --"),
        };
        s
    }

    /// The alarm line for an armed target that has no calendar rendering
    pub fn format_unknown_alarm_line() -> String<32> {
        String::try_from("ALARM: ??").unwrap_or_default()
    }

    /// Format the date as `"DayOfWeek DD.MM.YYYY"`, centered in a line of [`LINE_WIDTH`] characters,
    /// one example being `" Saturday 01.03.2025 "`
    pub fn format_date_line(dt: &PrimitiveDateTime) -> String<LINE_WIDTH> {
        let mut content: String<LINE_WIDTH> = String::new();
        let _ = write!(
            content,
            "{} {:02}.{:02}.{}",
            dt.weekday(),
            dt.day(),
            u8::from(dt.month()),
            dt.year()
        );

        let padding = LINE_WIDTH.saturating_sub(content.chars().count());
        let padding_left = padding / 2;

        let mut padded: String<LINE_WIDTH> = String::new();
        let _ = write!(padded, "{:padding_left$}{content}", "");
        while padded.push(' ').is_ok() {}
        padded
    }

    /// A printable rendering of a raw payload for log lines. Bytes outside printable ASCII are
    /// replaced by `.`.
    pub fn payload_preview(payload: &[u8]) -> String<MAX_PAYLOAD_LEN> {
        payload
            .iter()
            .take(MAX_PAYLOAD_LEN)
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    char::from(b)
                } else {
                    '.'
                }
            })
            .collect()
    }
}
