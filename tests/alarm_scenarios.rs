//! End to end behavior of the alarm clock core: messages in, keys in, snapshots and screens out.
#![allow(clippy::unwrap_used)]

use pico_remote_alarmclock::{
    AlarmMailbox, AlarmScheduler, AlarmState, CalendarSource, CalendarTimestamp, ClockReading,
    FixedOffsetZone, KeyEvent, ParseError, RenderAdapter, Screen, SyncedClock, UnixSeconds,
    parse_alarm, to_instant,
};
use time::macros::{datetime, offset};

/// 2025-03-01 07:30 UTC
const T: UnixSeconds = UnixSeconds(1_740_814_200);

const UTC: FixedOffsetZone = FixedOffsetZone::UTC;

fn secs(at: time::OffsetDateTime) -> UnixSeconds {
    UnixSeconds(at.unix_timestamp())
}

fn unset() -> AlarmScheduler {
    AlarmScheduler::new()
}

fn armed() -> AlarmScheduler {
    let mut scheduler = AlarmScheduler::new();
    scheduler.tick(
        UnixSeconds(T.0 - 3600),
        Some(b"2025-03-01 07:30".as_slice()),
        KeyEvent::None,
        &UTC,
    );
    assert_eq!(scheduler.state(), AlarmState::Armed(T));
    scheduler
}

fn ringing() -> AlarmScheduler {
    let mut scheduler = armed();
    scheduler.tick(T, None, KeyEvent::None, &UTC);
    assert_eq!(scheduler.state(), AlarmState::Ringing(T));
    scheduler
}

#[test]
fn intake_overrides_any_state() {
    let new_target = secs(datetime!(2025-03-02 06:00 UTC));
    for mut scheduler in [unset(), armed(), ringing()] {
        let snapshot = scheduler.tick(
            T,
            Some(b"2025-03-02 06:00".as_slice()),
            KeyEvent::None,
            &UTC,
        );
        assert_eq!(snapshot.state, AlarmState::Armed(new_target));
        assert!(!snapshot.output_active);
    }
}

#[test]
fn malformed_payload_changes_nothing() {
    let payloads: [&[u8]; 4] = [b"bad-data", b"", b"2025-03-01 7:30", b"tomorrow at seven"];
    for payload in payloads {
        for mut scheduler in [unset(), armed(), ringing()] {
            let before = scheduler.state();
            let snapshot = scheduler.tick(T, Some(payload), KeyEvent::None, &UTC);
            assert_eq!(snapshot.state, before);
        }
    }
}

#[test]
fn trigger_is_monotonic() {
    let mut scheduler = armed();
    for now in [T.0 - 2, T.0 - 1] {
        let snapshot = scheduler.tick(UnixSeconds(now), None, KeyEvent::None, &UTC);
        assert_eq!(snapshot.state, AlarmState::Armed(T));
    }

    // the first tick at or past the target rings, later ticks keep ringing
    for now in [T.0, T.0, T.0 + 1, T.0 + 600] {
        let snapshot = scheduler.tick(UnixSeconds(now), None, KeyEvent::None, &UTC);
        assert_eq!(snapshot.state, AlarmState::Ringing(T));
        assert!(snapshot.output_active);
    }
}

#[test]
fn late_tick_still_rings() {
    let mut scheduler = armed();
    let snapshot = scheduler.tick(UnixSeconds(T.0 + 7200), None, KeyEvent::None, &UTC);
    assert_eq!(snapshot.state, AlarmState::Ringing(T));
}

#[test]
fn dismiss_only_acts_on_ringing() {
    let mut scheduler = unset();
    let snapshot = scheduler.tick(T, None, KeyEvent::DismissPressed, &UTC);
    assert_eq!(snapshot.state, AlarmState::Unset);

    let mut scheduler = armed();
    let snapshot = scheduler.tick(UnixSeconds(T.0 - 1), None, KeyEvent::DismissPressed, &UTC);
    assert_eq!(snapshot.state, AlarmState::Armed(T));

    let mut scheduler = ringing();
    let snapshot = scheduler.tick(T, None, KeyEvent::DismissPressed, &UTC);
    assert_eq!(snapshot.state, AlarmState::Unset);
    assert!(!snapshot.exit_requested);
}

#[test]
fn mode_exit_is_absolute() {
    for mut scheduler in [unset(), armed(), ringing()] {
        let snapshot = scheduler.tick(T, None, KeyEvent::ModeExitPressed, &UTC);
        assert_eq!(snapshot.state, AlarmState::Unset);
        assert!(!snapshot.output_active);
        assert!(snapshot.exit_requested);
    }
}

#[test]
fn local_rendering_round_trips() {
    let zones = [
        UTC,
        FixedOffsetZone(offset!(+1)),
        FixedOffsetZone(offset!(+5:45)),
        FixedOffsetZone(offset!(-9:30)),
        FixedOffsetZone(offset!(+14)),
    ];
    // the naive reading has minute resolution, so the instants are whole minutes
    let instants = [
        UnixSeconds(0),
        T,
        secs(datetime!(2024-02-29 23:59 UTC)),
        secs(datetime!(2038-01-19 03:14 UTC)),
    ];

    for zone in zones {
        for instant in instants {
            let local = zone.render_local(instant).unwrap();
            let naive = CalendarTimestamp::new(
                u16::try_from(local.year()).unwrap(),
                u8::from(local.month()),
                local.day(),
                local.hour(),
                local.minute(),
            )
            .unwrap();
            assert_eq!(to_instant(&naive, instant, &zone), instant);
        }
    }
}

#[test]
fn scenario_a_trailing_bytes_arm_the_alarm() {
    let mut scheduler = AlarmScheduler::new();
    let mut render_adapter = RenderAdapter::new();
    let snapshot = scheduler.tick(
        UnixSeconds(T.0 - 60),
        Some(b"2025-03-01 07:30xyz".as_slice()),
        KeyEvent::None,
        &UTC,
    );
    assert_eq!(snapshot.state, AlarmState::Armed(T));
    assert_eq!(T.to_utc_datetime(), Some(datetime!(2025-03-01 07:30)));

    let Screen::Clock(face) = render_adapter.render(&snapshot, &UTC) else {
        panic!("expected the clock face");
    };
    assert_eq!(face.alarm.as_str(), "ALARM: 2025-03-01 07:30 UTC");
    assert_eq!(face.time.as_str(), "07:29:00 AM");
}

#[test]
fn scenario_b_bad_data() {
    assert_eq!(parse_alarm(b"bad-data"), Err(ParseError::Malformed));

    let mut scheduler = armed();
    let snapshot = scheduler.tick(
        UnixSeconds(T.0 - 60),
        Some(b"bad-data".as_slice()),
        KeyEvent::None,
        &UTC,
    );
    assert_eq!(snapshot.state, AlarmState::Armed(T));
}

#[test]
fn scenario_c_target_reached() {
    let mut scheduler = armed();
    let snapshot = scheduler.tick(T, None, KeyEvent::None, &UTC);
    assert_eq!(snapshot.state, AlarmState::Ringing(T));
    assert!(snapshot.output_active);
}

#[test]
fn scenario_d_dismiss() {
    let mut scheduler = ringing();
    let snapshot = scheduler.tick(UnixSeconds(T.0 + 5), None, KeyEvent::DismissPressed, &UTC);
    assert_eq!(snapshot.state, AlarmState::Unset);
    assert!(!snapshot.output_active);
}

#[test]
fn scenario_e_mode_exit() {
    let mut scheduler = armed();
    let mut render_adapter = RenderAdapter::new();
    let snapshot = scheduler.tick(
        UnixSeconds(T.0 - 60),
        None,
        KeyEvent::ModeExitPressed,
        &UTC,
    );
    assert_eq!(snapshot.state, AlarmState::Unset);
    assert!(snapshot.exit_requested);
    assert_eq!(render_adapter.render(&snapshot, &UTC), Screen::Blank);
}

#[test]
fn message_through_mailbox_with_synced_clock() {
    static MAILBOX: AlarmMailbox = AlarmMailbox::new();

    let mut clock = SyncedClock::new();
    clock
        .sync(
            ClockReading {
                now: secs(datetime!(2025-03-01 06:00 UTC)),
                offset: offset!(+1),
            },
            100,
        )
        .unwrap();

    // an older message is replaced by the newer one before the loop gets to it
    MAILBOX.post(b"2025-03-01 07:00");
    MAILBOX.post(b"2025-03-01 08:30 wake up!");

    let mut scheduler = AlarmScheduler::new();
    let mut render_adapter = RenderAdapter::new();

    let now = clock.now(100).unwrap();
    let message = MAILBOX.take();
    let snapshot = scheduler.tick(now, message.as_deref(), KeyEvent::None, &clock);
    // 08:30 local at +1 is 07:30 UTC
    assert_eq!(snapshot.state, AlarmState::Armed(T));
    assert!(MAILBOX.take().is_none());

    let now = clock.now(100 + 5400).unwrap();
    assert_eq!(now, T);
    let snapshot = scheduler.tick(now, MAILBOX.take().as_deref(), KeyEvent::None, &clock);
    assert!(snapshot.output_active);
    assert_eq!(snapshot.poll_interval_ms(), 300);
    assert!(matches!(
        render_adapter.render(&snapshot, &clock),
        Screen::Alert(_)
    ));
}

#[test]
fn message_during_standby_arms_after_wake() {
    static MAILBOX: AlarmMailbox = AlarmMailbox::new();

    let mut scheduler = armed();
    let snapshot = scheduler.tick(
        UnixSeconds(T.0 - 120),
        None,
        KeyEvent::ModeExitPressed,
        &UTC,
    );
    assert!(snapshot.exit_requested);

    // posted while the loop waits in standby
    MAILBOX.post(b"2025-03-01 07:30");

    // the loop restarts with a fresh scheduler and the message still pending
    let mut scheduler = AlarmScheduler::new();
    let snapshot = scheduler.tick(
        UnixSeconds(T.0 - 60),
        MAILBOX.take().as_deref(),
        KeyEvent::None,
        &UTC,
    );
    assert_eq!(snapshot.state, AlarmState::Armed(T));
    assert!(!snapshot.exit_requested);
}

#[test]
fn oversized_datagram_still_arms() {
    static MAILBOX: AlarmMailbox = AlarmMailbox::new();

    let mut datagram = [b'.'; 200];
    datagram[..16].copy_from_slice(b"2025-03-01 07:30");
    MAILBOX.post(&datagram);

    let message = MAILBOX.take().unwrap();
    assert_eq!(message.len(), 63);

    let mut scheduler = AlarmScheduler::new();
    let snapshot = scheduler.tick(
        UnixSeconds(T.0 - 60),
        Some(message.as_slice()),
        KeyEvent::None,
        &UTC,
    );
    assert_eq!(snapshot.state, AlarmState::Armed(T));
}
