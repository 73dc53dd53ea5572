//! Tasks that make up the firmware as well as the resources they use.
#[macro_use]
pub mod resources;

pub mod alarm_clock;
pub mod buttons;
pub mod display;
pub mod network;
