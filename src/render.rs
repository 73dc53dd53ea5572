//! # Render adapter
//! Turns a scheduler [`Snapshot`] into a description of what the display shows. The display task
//! only draws a [`Screen`]; it never looks at the alarm state itself.
use heapless::String;

use crate::calendar::CalendarSource;
use crate::scheduler::Snapshot;
use crate::utility::string_utils::{LINE_WIDTH, StringUtils};

/// Full screen colors the display alternates between while the alarm rings
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertColor {
    /// Red alert frame
    Red,
    /// Green alert frame
    Green,
}

/// The regular clock face
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ClockFace {
    /// Local time of day, 12 hour clock
    pub time: String<11>,
    /// Local date, centered
    pub date: String<LINE_WIDTH>,
    /// The armed alarm target, the unset marker or the marker for a target outside the calendar
    pub alarm: String<32>,
}

/// What the display shows
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Screen {
    /// The clock face with the alarm line
    Clock(ClockFace),
    /// One full screen frame of the ringing alert
    Alert(AlertColor),
    /// Nothing, alarm clock mode has been left
    Blank,
}

/// Keeps the alert flashing phase between frames
#[derive(Debug, Default)]
pub struct RenderAdapter {
    /// The last alert frame was red
    flash: bool,
}

impl RenderAdapter {
    /// Create a new `RenderAdapter`
    #[must_use]
    pub const fn new() -> Self {
        Self { flash: false }
    }

    /// Describe the screen for `snapshot`. While the alarm rings every call flips the alert
    /// color, starting with red.
    pub fn render<C: CalendarSource + ?Sized>(
        &mut self,
        snapshot: &Snapshot,
        calendar: &C,
    ) -> Screen {
        if snapshot.exit_requested {
            self.flash = false;
            return Screen::Blank;
        }

        if snapshot.state.is_ringing() {
            self.flash = !self.flash;
            return Screen::Alert(if self.flash {
                AlertColor::Red
            } else {
                AlertColor::Green
            });
        }
        self.flash = false;

        let alarm = match snapshot.state.target() {
            None => StringUtils::format_alarm_line(None),
            Some(target) => match target.to_utc_datetime() {
                Some(dt) => StringUtils::format_alarm_line(Some(&dt)),
                None => StringUtils::format_unknown_alarm_line(),
            },
        };

        let face = match calendar.render_local(snapshot.now) {
            Some(local) => ClockFace {
                time: StringUtils::format_clock_time(&local),
                date: StringUtils::format_date_line(&local),
                alarm,
            },
            None => ClockFace {
                time: String::try_from("--:--:--").unwrap_or_default(),
                date: String::new(),
                alarm,
            },
        };
        Screen::Clock(face)
    }
}
