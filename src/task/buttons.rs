//! # Button Tasks
//! This module contains the tasks for the buttons. Each button has its own task and posts its key
//! into the key mailbox of the alarm clock loop.
//!
//! The green and the blue button dismiss a ringing alarm, the yellow button leaves alarm clock
//! mode and wakes the clock up again from standby.
use defmt::{Format, info};
use embassy_rp::gpio::{Input, Level};
use embassy_time::{Duration, Timer};
use pico_remote_alarmclock::KeyEvent;

use crate::task::alarm_clock::KEY_MAILBOX;

/// Debounces a button and posts a key for every press
pub struct ButtonManager<'a> {
    /// The input pin for the button
    input: Input<'a>,
    /// The debounce duration
    debounce_duration: Duration,
    /// The key to post when the button is pressed
    key: KeyEvent,
    /// The button being managed
    button: Button,
}

/// The buttons of the system
#[derive(Debug, Format, Eq, PartialEq, Clone, Copy)]
pub enum Button {
    /// Green button
    Green,
    /// Blue button
    Blue,
    /// Yellow button
    Yellow,
}

impl Button {
    /// The key a press of this button stands for
    pub const fn key(self) -> KeyEvent {
        match self {
            Self::Green | Self::Blue => KeyEvent::DismissPressed,
            Self::Yellow => KeyEvent::ModeExitPressed,
        }
    }
}

impl<'a> ButtonManager<'a> {
    /// Create a new `ButtonManager`
    pub const fn new(input: Input<'a>, button: Button) -> Self {
        Self {
            input,
            debounce_duration: Duration::from_millis(80), // all buttons share the debounce duration
            key: button.key(),
            button,
        }
    }

    /// Wait for debounced presses forever. The button is pulled up, so a press takes the level low.
    /// The key is posted on the press itself, holding the button does not repeat it.
    pub async fn handle_button_press(&mut self) -> ! {
        loop {
            if self.debounce().await == Level::Low {
                info!("{} button pressed", self.button);
                KEY_MAILBOX.post(self.key);
            }
        }
    }

    /// Debounce the button by waiting for the level to be stable for the debounce duration.
    /// Returns the new level once it differs from the level before the edge.
    pub async fn debounce(&mut self) -> Level {
        loop {
            let l1 = self.input.get_level();

            self.input.wait_for_any_edge().await;

            Timer::after(self.debounce_duration).await;

            let l2 = self.input.get_level();
            if l1 != l2 {
                break l2;
            }
        }
    }
}

#[embassy_executor::task(pool_size = 3)]
pub async fn button_handler(input: Input<'static>, button: Button) {
    let mut btn = ButtonManager::new(input, button);
    info!("{} button task started", btn.button);
    btn.handle_button_press().await;
}
