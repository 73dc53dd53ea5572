//! # Remote alarm clock firmware
//! Raspberry Pi Pico W alarm clock. The alarm is set remotely by sending `YYYY-MM-DD hh:mm` to a
//! UDP port, the clock is synced from a time API, the alarm rings on GPIO 16 and flashes the OLED.
#![no_std]
#![no_main]

use crate::task::alarm_clock::alarm_clock;
use crate::task::buttons::{Button, button_handler};
use crate::task::display::display_handler;
use crate::task::network::network;
use crate::task::resources::{
    AlarmOutputResources, AssignedResources, BlueButtonResources, DisplayResources,
    GreenButtonResources, WifiResources, YellowButtonResources,
};
use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pull};
use {defmt_rtt as _, panic_probe as _};

#[macro_use]
mod task;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Program start");

    // Initialize the peripherals for the RP2040
    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);

    // buttons
    let green_button = Input::new(r.btn_green.button_pin, Pull::Up);
    unwrap!(spawner.spawn(button_handler(green_button, Button::Green)));
    let blue_button = Input::new(r.btn_blue.button_pin, Pull::Up);
    unwrap!(spawner.spawn(button_handler(blue_button, Button::Blue)));
    let yellow_button = Input::new(r.btn_yellow.button_pin, Pull::Up);
    unwrap!(spawner.spawn(button_handler(yellow_button, Button::Yellow)));

    unwrap!(spawner.spawn(display_handler(r.display)));
    unwrap!(spawner.spawn(network(spawner, r.wifi)));
    unwrap!(spawner.spawn(alarm_clock(r.alarm_output)));
}
