//! # Calendar types
//! The two ways the alarm clock talks about time: absolute instants coming from the synchronized
//! clock, and naive wall-clock readings typed by a remote user.
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Seconds since 1970-01-01 00:00:00 UTC
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnixSeconds(pub i64);

impl UnixSeconds {
    /// Get the underlying i64 value
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Move the instant forward by `secs` seconds, saturating at the ends of the range
    #[must_use]
    pub const fn saturating_add_secs(self, secs: i64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Render the instant in the UTC calendar.
    /// Returns `None` outside the year range the `time` crate supports.
    #[must_use]
    pub fn to_utc_datetime(self) -> Option<PrimitiveDateTime> {
        self.to_datetime_with_offset(UtcOffset::UTC)
    }

    /// Render the instant as wall-clock reading in a calendar that is `offset` away from UTC.
    #[must_use]
    pub fn to_datetime_with_offset(self, offset: UtcOffset) -> Option<PrimitiveDateTime> {
        let shifted = self.0.checked_add(i64::from(offset.whole_seconds()))?;
        OffsetDateTime::from_unix_timestamp(shifted)
            .ok()
            .map(|dt| PrimitiveDateTime::new(dt.date(), dt.time()))
    }
}

/// A naive wall-clock reading `{year, month, day, hour, minute}` as sent by a remote user.
///
/// The raw fields are kept as received. Out of range fields are folded into a proper calendar
/// reading on construction the same way ordinary calendar arithmetic overflows: month 13 is
/// January of the next year, day 0 is the last day of the previous month, hour 24 is midnight of
/// the next day.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct CalendarTimestamp {
    /// Year as received
    year: u16,
    /// Month as received, nominally 1-12
    month: u8,
    /// Day of month as received, nominally 1-31
    day: u8,
    /// Hour as received, nominally 0-23
    hour: u8,
    /// Minute as received, nominally 0-59
    minute: u8,
    /// The normalized reading
    civil: PrimitiveDateTime,
}

impl CalendarTimestamp {
    /// Create a new `CalendarTimestamp`.
    /// Returns `None` only if normalizing the fields leaves the representable calendar range.
    #[must_use]
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8) -> Option<Self> {
        let months = i32::from(year) * 12 + i32::from(month) - 1;
        let month_index = u8::try_from(months.rem_euclid(12) + 1).ok()?;
        let first_of_month =
            Date::from_calendar_date(months.div_euclid(12), Month::try_from(month_index).ok()?, 1)
                .ok()?;
        let civil = first_of_month
            .midnight()
            .checked_add(Duration::days(i64::from(day) - 1))?
            .checked_add(Duration::hours(i64::from(hour)))?
            .checked_add(Duration::minutes(i64::from(minute)))?;

        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            civil,
        })
    }

    /// Get the year as received
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Get the month as received
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Get the day as received
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Get the hour as received
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Get the minute as received
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// The normalized wall-clock reading
    #[must_use]
    pub const fn civil(&self) -> PrimitiveDateTime {
        self.civil
    }

    /// Seconds of the normalized reading counted as if it were a UTC reading
    #[must_use]
    pub fn civil_seconds(&self) -> i64 {
        self.civil.assume_utc().unix_timestamp()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CalendarTimestamp {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute
        );
    }
}

/// Renders instants in the local and the UTC calendar.
///
/// This is the part of the clock source the core needs to derive the local offset.
pub trait CalendarSource {
    /// Render `at` as a local wall-clock reading
    fn render_local(&self, at: UnixSeconds) -> Option<PrimitiveDateTime>;

    /// Render `at` as a UTC wall-clock reading
    fn render_utc(&self, at: UnixSeconds) -> Option<PrimitiveDateTime> {
        at.to_utc_datetime()
    }
}

/// A local calendar that is a constant offset away from UTC
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FixedOffsetZone(pub UtcOffset);

impl FixedOffsetZone {
    /// The UTC calendar itself
    pub const UTC: Self = Self(UtcOffset::UTC);

    /// Create a zone from an offset in seconds east of UTC
    #[must_use]
    pub fn from_whole_seconds(seconds: i32) -> Option<Self> {
        UtcOffset::from_whole_seconds(seconds).ok().map(Self)
    }
}

impl Default for FixedOffsetZone {
    fn default() -> Self {
        Self::UTC
    }
}

impl CalendarSource for FixedOffsetZone {
    fn render_local(&self, at: UnixSeconds) -> Option<PrimitiveDateTime> {
        at.to_datetime_with_offset(self.0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_regular_reading_is_kept() {
        let ts = CalendarTimestamp::new(2025, 3, 1, 7, 30).unwrap();
        assert_eq!(ts.civil(), datetime!(2025-03-01 07:30));
        assert_eq!((ts.year(), ts.month(), ts.day()), (2025, 3, 1));
        assert_eq!((ts.hour(), ts.minute()), (7, 30));
    }

    #[test]
    fn test_month_overflow_rolls_into_next_year() {
        let ts = CalendarTimestamp::new(2025, 13, 1, 0, 0).unwrap();
        assert_eq!(ts.civil(), datetime!(2026-01-01 00:00));
        // raw fields stay as received
        assert_eq!(ts.month(), 13);
    }

    #[test]
    fn test_month_zero_is_previous_december() {
        let ts = CalendarTimestamp::new(2025, 0, 15, 12, 0).unwrap();
        assert_eq!(ts.civil(), datetime!(2024-12-15 12:00));
    }

    #[test]
    fn test_day_overflow() {
        assert_eq!(
            CalendarTimestamp::new(2024, 2, 30, 0, 0).unwrap().civil(),
            datetime!(2024-03-01 00:00)
        );
        assert_eq!(
            CalendarTimestamp::new(2025, 3, 0, 6, 0).unwrap().civil(),
            datetime!(2025-02-28 06:00)
        );
        assert_eq!(
            CalendarTimestamp::new(2025, 12, 32, 0, 0).unwrap().civil(),
            datetime!(2026-01-01 00:00)
        );
    }

    #[test]
    fn test_time_overflow() {
        let ts = CalendarTimestamp::new(2025, 6, 30, 24, 75).unwrap();
        assert_eq!(ts.civil(), datetime!(2025-07-01 01:15));
    }

    #[test]
    fn test_out_of_range_year_is_rejected() {
        assert!(CalendarTimestamp::new(9999, 99, 1, 0, 0).is_none());
        assert!(CalendarTimestamp::new(9999, 12, 31, 23, 59).is_some());
    }

    #[test]
    fn test_civil_seconds() {
        let ts = CalendarTimestamp::new(1970, 1, 2, 0, 0).unwrap();
        assert_eq!(ts.civil_seconds(), 86_400);
    }

    #[test]
    fn test_render_with_offset() {
        let at = UnixSeconds(datetime!(2025-03-01 06:30 UTC).unix_timestamp());
        let cet = FixedOffsetZone::from_whole_seconds(3600).unwrap();
        assert_eq!(cet.render_local(at), Some(datetime!(2025-03-01 07:30)));
        assert_eq!(cet.render_utc(at), Some(datetime!(2025-03-01 06:30)));
        assert_eq!(FixedOffsetZone::UTC.render_local(at), cet.render_utc(at));
    }

    #[test]
    fn test_render_out_of_range() {
        assert!(UnixSeconds(i64::MAX).to_utc_datetime().is_none());
        assert_eq!(
            UnixSeconds(i64::MAX).saturating_add_secs(1),
            UnixSeconds(i64::MAX)
        );
    }
}
