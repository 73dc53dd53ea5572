//! Small helpers shared by the core and the firmware tasks.
pub mod string_utils;
