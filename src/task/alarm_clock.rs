//! # Alarm clock task
//! The cooperative loop of alarm clock mode. Every iteration reads the clock, takes the pending
//! alarm message and key, ticks the scheduler, drives the alarm output and hands the screen to
//! the display task.
//!
//! Leaving alarm clock mode puts the clock into standby: the output goes low, the display goes
//! blank and the loop waits for the wake button. Alarm clock mode restarts without the
//! previous alarm, a message received during standby arms the first tick after waking.
use defmt::info;
use embassy_rp::gpio::{Level, Output};
use embassy_time::{Duration, Instant, Timer, with_timeout};
use pico_remote_alarmclock::{
    AlarmMailbox, AlarmScheduler, KeyEvent, KeyMailbox, RenderAdapter, Screen, Snapshot,
};

use crate::task::display::signal_display;
use crate::task::network::CLOCK_MUTEX;
use crate::task::resources::AlarmOutputResources;

/// Alarm messages from the network listener
pub static ALARM_MAILBOX: AlarmMailbox = AlarmMailbox::new();

/// Key presses from the button tasks
pub static KEY_MAILBOX: KeyMailbox = KeyMailbox::new();

/// How often to look for a synced clock before the first sync
const CLOCK_WAIT: Duration = Duration::from_secs(1);

/// Drive the alarm output from the snapshot
fn drive_output(output: &mut Output<'static>, snapshot: &Snapshot) {
    if snapshot.output_active {
        output.set_high();
    } else {
        output.set_low();
    }
}

/// Stay in standby until the wake button is pressed
async fn standby(output: &mut Output<'static>) {
    output.set_low();
    signal_display(Screen::Blank);
    info!("Standby, waiting for the wake button");

    while KEY_MAILBOX.wait().await != KeyEvent::ModeExitPressed {}

    // a message received during standby stays in the mailbox for the first tick
    info!("Waking up");
}

#[embassy_executor::task]
pub async fn alarm_clock(r: AlarmOutputResources) {
    info!("Alarm clock task started");

    let mut output = Output::new(r.output_pin, Level::Low);
    let mut scheduler = AlarmScheduler::new();
    let mut render_adapter = RenderAdapter::new();
    let mut pending_key = KeyEvent::None;

    loop {
        let clock = *CLOCK_MUTEX.lock().await;
        let Some(now) = clock.now(Instant::now().as_secs()) else {
            Timer::after(CLOCK_WAIT).await;
            continue;
        };

        let message = ALARM_MAILBOX.take();
        let key = match pending_key {
            KeyEvent::None => KEY_MAILBOX.take(),
            key => key,
        };
        pending_key = KeyEvent::None;

        let snapshot = scheduler.tick(now, message.as_deref(), key, &clock);
        drive_output(&mut output, &snapshot);
        signal_display(render_adapter.render(&snapshot, &clock));

        if snapshot.exit_requested {
            standby(&mut output).await;
            scheduler = AlarmScheduler::new();
            render_adapter = RenderAdapter::new();
            continue;
        }

        // a key press ends the wait early
        if let Ok(key) = with_timeout(
            Duration::from_millis(snapshot.poll_interval_ms()),
            KEY_MAILBOX.wait(),
        )
        .await
        {
            pending_key = key;
        }
    }
}
