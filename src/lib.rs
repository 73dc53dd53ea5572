//! # Remote alarm clock core
//! Hardware independent part of the alarm clock: the alarm state machine, the parser for
//! remotely sent alarm messages, the conversion of naive wall-clock readings into instants,
//! and the small pieces the firmware tasks hand data through.
//!
//! Everything in here is `no_std`, does no I/O and never blocks, so the same code runs in the
//! firmware tick loop and in host tests.
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod calendar;
pub mod clock;
pub mod mailbox;
pub mod message;
pub mod normalize;
pub mod render;
pub mod scheduler;
pub mod time_api;
pub mod utility;

pub use calendar::{CalendarSource, CalendarTimestamp, FixedOffsetZone, UnixSeconds};
pub use clock::{ClockError, ClockReading, SyncedClock};
pub use mailbox::{AlarmMailbox, AlarmPayload, KeyMailbox};
pub use message::{MAX_PAYLOAD_LEN, MIN_PAYLOAD_LEN, ParseError, parse_alarm};
pub use normalize::{local_offset, to_instant};
pub use render::{AlertColor, ClockFace, RenderAdapter, Screen};
pub use scheduler::{AlarmScheduler, AlarmState, KeyEvent, Snapshot};
pub use time_api::{TimeApiError, parse_time_api_response};
