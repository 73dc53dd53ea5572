//! # Alarm scheduler
//! The state machine of the alarm clock. It owns the alarm state and is advanced once per loop
//! iteration with the current instant, an optional freshly received alarm message and the key
//! pressed since the last iteration. Each tick returns a [`Snapshot`] for the display and the
//! alarm output; nothing outside the scheduler writes the alarm state.
//!
//! Within one tick the steps run in a fixed order:
//! 1. a valid message arms the alarm, whatever the previous state
//! 2. an armed alarm whose target has been reached starts ringing
//! 3. a dismiss key silences a ringing alarm
//! 4. the mode exit key clears the alarm and asks the caller to leave alarm clock mode
use crate::calendar::{CalendarSource, UnixSeconds};
use crate::message::parse_alarm;
use crate::normalize::to_instant;
use crate::utility::string_utils::StringUtils;

/// Loop cadence while the alarm is quiet
pub const TICK_INTERVAL_MS: u64 = 1_000;

/// Loop cadence while the alarm is ringing, this is also the alert flashing rate
pub const RINGING_TICK_INTERVAL_MS: u64 = 300;

/// The state of the alarm
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmState {
    /// No alarm is configured
    #[default]
    Unset,
    /// The alarm waits for its target instant
    Armed(UnixSeconds),
    /// The target instant has been reached and the alarm output is active
    Ringing(UnixSeconds),
}

impl AlarmState {
    /// Check if the alarm is ringing
    #[must_use]
    pub const fn is_ringing(&self) -> bool {
        matches!(self, Self::Ringing(_))
    }

    /// The target instant of an armed or ringing alarm
    #[must_use]
    pub const fn target(&self) -> Option<UnixSeconds> {
        match self {
            Self::Unset => None,
            Self::Armed(target) | Self::Ringing(target) => Some(*target),
        }
    }
}

/// The key pressed since the last tick
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// No key was pressed
    #[default]
    None,
    /// One of the dismiss buttons was pressed
    DismissPressed,
    /// The button that leaves alarm clock mode was pressed
    ModeExitPressed,
}

/// What a tick produced. The display and the alarm output only ever see this value.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// The alarm state after the tick
    pub state: AlarmState,
    /// The instant the tick ran at
    pub now: UnixSeconds,
    /// Level for the alarm output, true only while ringing
    pub output_active: bool,
    /// The caller must leave alarm clock mode
    pub exit_requested: bool,
}

impl Snapshot {
    /// How long the caller should wait before the next tick
    #[must_use]
    pub const fn poll_interval_ms(&self) -> u64 {
        if self.output_active {
            RINGING_TICK_INTERVAL_MS
        } else {
            TICK_INTERVAL_MS
        }
    }
}

/// Owns the alarm state and runs the tick
#[derive(Debug, Default)]
pub struct AlarmScheduler {
    /// The current alarm state
    state: AlarmState,
}

impl AlarmScheduler {
    /// Create a new `AlarmScheduler` without an alarm
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AlarmState::Unset,
        }
    }

    /// The current alarm state
    #[must_use]
    pub const fn state(&self) -> AlarmState {
        self.state
    }

    /// Advance the state machine by one tick.
    ///
    /// `message` is the raw payload received since the last tick, if any. A payload that does not
    /// parse leaves the state untouched; there is no channel to report it back to the sender.
    pub fn tick<C: CalendarSource + ?Sized>(
        &mut self,
        now: UnixSeconds,
        message: Option<&[u8]>,
        key: KeyEvent,
        calendar: &C,
    ) -> Snapshot {
        if let Some(payload) = message {
            self.intake(payload, now, calendar);
        }

        if let AlarmState::Armed(target) = self.state {
            if now >= target {
                info!("Alarm reached its target {}, ringing", target.as_i64());
                self.state = AlarmState::Ringing(target);
            }
        }

        let exit_requested = match key {
            KeyEvent::None => false,
            KeyEvent::DismissPressed => {
                if self.state.is_ringing() {
                    info!("Alarm dismissed");
                    self.state = AlarmState::Unset;
                }
                false
            }
            KeyEvent::ModeExitPressed => {
                info!("Leaving alarm clock mode");
                self.state = AlarmState::Unset;
                true
            }
        };

        Snapshot {
            state: self.state,
            now,
            output_active: self.state.is_ringing(),
            exit_requested,
        }
    }

    /// Arm the alarm from a received payload, replacing any previous alarm
    fn intake<C: CalendarSource + ?Sized>(
        &mut self,
        payload: &[u8],
        now: UnixSeconds,
        calendar: &C,
    ) {
        match parse_alarm(payload) {
            Ok(naive) => {
                let target = to_instant(&naive, now, calendar);
                info!(
                    "Alarm set to {} from {}",
                    target.as_i64(),
                    StringUtils::payload_preview(payload).as_str()
                );
                self.state = AlarmState::Armed(target);
            }
            Err(_) => {
                warn!(
                    "Bad alarm payload {}",
                    StringUtils::payload_preview(payload).as_str()
                );
            }
        }
    }
}
