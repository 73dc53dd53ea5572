//! # Synced clock
//! Wall-clock time for a board without a battery backed clock. A reading fetched from the network
//! anchors the clock, the monotonic uptime counter carries it forward until the next sync.
use thiserror::Error;
use time::UtcOffset;

use crate::calendar::{CalendarSource, UnixSeconds};

/// Readings before 2016-01-01 00:00 UTC come from a clock that was never set
pub const MIN_PLAUSIBLE: UnixSeconds = UnixSeconds(1_451_606_400);

/// A wall-clock reading as delivered by a time source
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ClockReading {
    /// The current instant
    pub now: UnixSeconds,
    /// Offset of the local calendar from UTC at `now`, daylight saving included
    pub offset: UtcOffset,
}

/// Why a reading was not accepted
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// The reading lies before [`MIN_PLAUSIBLE`]
    #[error("clock reading is not plausible")]
    Implausible,
}

/// The last accepted reading together with the uptime it was taken at
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct Anchor {
    /// The accepted reading
    reading: ClockReading,
    /// Uptime in seconds when the reading was taken
    uptime_secs: u64,
}

/// Wall-clock time derived from the last sync and the uptime since then
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SyncedClock {
    /// `None` until the first sync
    anchor: Option<Anchor>,
}

impl SyncedClock {
    /// Create a clock that has not been synced yet
    #[must_use]
    pub const fn new() -> Self {
        Self { anchor: None }
    }

    /// Anchor the clock to `reading`, taken at `uptime_secs`.
    ///
    /// # Errors
    /// [`ClockError::Implausible`] if the reading lies before 2016. The clock keeps its previous
    /// anchor in that case.
    pub fn sync(&mut self, reading: ClockReading, uptime_secs: u64) -> Result<(), ClockError> {
        if reading.now < MIN_PLAUSIBLE {
            warn!("Ignoring implausible clock reading {}", reading.now.as_i64());
            return Err(ClockError::Implausible);
        }
        info!(
            "Clock synced to {} with offset {}s",
            reading.now.as_i64(),
            reading.offset.whole_seconds()
        );
        self.anchor = Some(Anchor {
            reading,
            uptime_secs,
        });
        Ok(())
    }

    /// Check whether the clock has been synced at least once
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.anchor.is_some()
    }

    /// The current instant, `None` before the first sync
    #[must_use]
    pub fn now(&self, uptime_secs: u64) -> Option<UnixSeconds> {
        self.anchor.map(|anchor| {
            let elapsed = uptime_secs.saturating_sub(anchor.uptime_secs);
            anchor
                .reading
                .now
                .saturating_add_secs(i64::try_from(elapsed).unwrap_or(i64::MAX))
        })
    }

    /// Offset of the local calendar reported by the last sync
    #[must_use]
    pub fn offset(&self) -> Option<UtcOffset> {
        self.anchor.map(|anchor| anchor.reading.offset)
    }
}

impl CalendarSource for SyncedClock {
    fn render_local(&self, at: UnixSeconds) -> Option<time::PrimitiveDateTime> {
        at.to_datetime_with_offset(self.offset().unwrap_or(UtcOffset::UTC))
    }
}
