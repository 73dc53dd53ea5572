//! # Display task
//! This module contains the task that draws on the OLED display.
//!
//! The task owns the SSD1306 128x64 display on I2C0. It waits for a [`Screen`] from the alarm clock
//! loop and draws it. The OLED is monochrome, so the red alert frame is a lit panel and the green
//! alert frame a dark one.
use defmt::{Debug2Format, error, info};
use embassy_rp::i2c::{Config, I2c};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle, MonoTextStyleBuilder,
        ascii::{FONT_4X6, FONT_6X13, FONT_9X18_BOLD},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use pico_remote_alarmclock::{AlertColor, ClockFace, Screen};
use ssd1306_async::{I2CDisplayInterface, Ssd1306, prelude::*};

use crate::task::resources::{DisplayResources, Irqs};

/// Signal carrying the next screen to draw, a newer screen replaces one not drawn yet
static DISPLAY_SIGNAL: Signal<CriticalSectionRawMutex, Screen> = Signal::new();

/// Signals the display task to draw `screen`
pub fn signal_display(screen: Screen) {
    DISPLAY_SIGNAL.signal(screen);
}

/// Waits for the next screen to draw
async fn wait_for_screen() -> Screen {
    DISPLAY_SIGNAL.wait().await
}

/// Horizontal center of the display
const CENTER_X: i32 = 64;

/// Top of the time line
const TIME_POSITION: Point = Point::new(CENTER_X, 8);

/// Top of the date line
const DATE_POSITION: Point = Point::new(CENTER_X, 32);

/// Top of the alarm line
const ALARM_POSITION: Point = Point::new(CENTER_X, 54);

/// Draw `screen` into `target`
fn draw_screen<D>(target: &mut D, screen: &Screen) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    match screen {
        Screen::Clock(face) => draw_clock_face(target, face),
        Screen::Alert(AlertColor::Red) => Rectangle::new(Point::zero(), Size::new(128, 64))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(target),
        Screen::Alert(AlertColor::Green) | Screen::Blank => Ok(()),
    }
}

/// Draw the time, the date and the alarm line, each centered
fn draw_clock_face<D>(target: &mut D, face: &ClockFace) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let centered = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();

    Text::with_text_style(&face.time, TIME_POSITION, text_style(&FONT_9X18_BOLD), centered)
        .draw(target)?;
    Text::with_text_style(&face.date, DATE_POSITION, text_style(&FONT_6X13), centered)
        .draw(target)?;
    Text::with_text_style(&face.alarm, ALARM_POSITION, text_style(&FONT_4X6), centered)
        .draw(target)?;
    Ok(())
}

/// Lit text in `font`
fn text_style(font: &'static MonoFont<'static>) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(font)
        .text_color(BinaryColor::On)
        .build()
}

#[embassy_executor::task]
pub async fn display_handler(r: DisplayResources) {
    info!("Display task started");

    let mut config = Config::default();
    config.frequency = 400_000;
    let i2c = I2c::new_async(r.i2c0, r.scl, r.sda, Irqs, config);

    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if let Err(e) = display.init().await {
        error!("Failed to initialize display: {}", Debug2Format(&e));
        return;
    }
    if let Err(e) = display.set_brightness(Brightness::DIM).await {
        error!("Failed to set display brightness: {}", Debug2Format(&e));
    }

    loop {
        let screen = wait_for_screen().await;

        // nothing is sent to the display before flush()
        display.clear();
        if let Err(e) = draw_screen(&mut display, &screen) {
            error!("Failed to draw screen: {}", Debug2Format(&e));
            continue;
        }
        if let Err(e) = display.flush().await {
            error!("Failed to flush display: {}", Debug2Format(&e));
        }
    }
}
