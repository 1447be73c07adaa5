//! LockController scheduling: lock, alarm escalation, unlock.

use crate::mock_hw::{HwCall, MockCalendar, MockClock, MockHardware, RecordingSink};
use phonebox::alarm::{AlarmAction, AlarmState};
use phonebox::app::events::{AlarmStatus, AppEvent, Trigger};
use phonebox::app::ports::{Colour, Tune};
use phonebox::app::service::{CycleOutcome, LockController, LockState};
use phonebox::config::LockboxConfig;
use phonebox::error::RemoteUnavailable;

const WEDNESDAY: u8 = 3;
const SATURDAY: u8 = 6;
const THURSDAY: u8 = 4;

fn controller() -> LockController {
    LockController::new(&LockboxConfig::default())
}

#[test]
fn start_shows_ready_colour() {
    let mut ctl = controller();
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    ctl.start(&mut hw, &mut sink);

    assert_eq!(hw.calls, vec![HwCall::Show(Colour::Blue)]);
    assert_eq!(sink.events, vec![AppEvent::Started(LockState::Unlocked)]);
}

#[test]
fn locks_exactly_once_inside_window() {
    let mut ctl = controller();
    let mut clock = MockClock::at(20, 0, WEDNESDAY);
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::Locked);
    assert_eq!(
        hw.calls,
        vec![HwCall::Lock, HwCall::Play(Tune::Lock), HwCall::Show(Colour::Red)]
    );
    assert_eq!(ctl.state(), LockState::Locked);
    assert!(sink.events.contains(&AppEvent::Locked(Trigger::Schedule)));

    for _ in 0..10 {
        clock.advance(5);
        assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::NoChange);
    }
    assert_eq!(hw.count(HwCall::Lock), 1);
    // Locked cycles never consult the calendar.
    assert_eq!(cal.queries, 1);
}

#[test]
fn calendar_false_blocks_locking() {
    let mut ctl = controller();
    let mut clock = MockClock::at(21, 0, WEDNESDAY);
    let mut cal = MockCalendar::answering(Ok(false));
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    for _ in 0..5 {
        assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::NoChange);
        clock.advance(5);
    }
    assert!(hw.calls.is_empty());
    assert_eq!(ctl.state(), LockState::Unlocked);
}

#[test]
fn unreachable_calendar_never_locks() {
    let mut ctl = controller();
    let mut clock = MockClock::at(22, 15, WEDNESDAY);
    let mut cal = MockCalendar::answering(Err(RemoteUnavailable));
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::NoChange);
    assert!(hw.calls.is_empty());
}

#[test]
fn calendar_is_cached_between_cycles() {
    let mut ctl = controller();
    let mut clock = MockClock::at(12, 0, WEDNESDAY);
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    // Default TTL is 15 minutes, cycles every 5 s.
    for _ in 0..180 {
        ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink);
        clock.advance(5);
    }
    assert_eq!(cal.queries, 1);
    clock.advance(5);
    ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink);
    assert_eq!(cal.queries, 2);
}

#[test]
fn open_lid_escalates_then_gives_up() {
    let mut ctl = controller();
    let mut clock = MockClock::at(20, 0, WEDNESDAY);
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::lid_open();
    let mut sink = RecordingSink::new();

    assert_eq!(
        ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink),
        CycleOutcome::Alarm(AlarmAction::StartSounding)
    );
    assert_eq!(hw.calls, vec![HwCall::Show(Colour::Red), HwCall::Play(Tune::Alarm)]);
    assert_eq!(sink.count(|e| *e == AppEvent::AlarmStarted), 1);

    clock.advance(60);
    assert_eq!(
        ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink),
        CycleOutcome::Alarm(AlarmAction::KeepSounding)
    );
    assert_eq!(hw.count(HwCall::Play(Tune::Alarm)), 2);

    // Three minutes after the first sounding.
    clock.advance(120);
    let mark = hw.calls.len();
    assert_eq!(
        ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink),
        CycleOutcome::Alarm(AlarmAction::GiveUp)
    );
    assert!(hw.since(mark).is_empty());
    assert_eq!(ctl.alarm_state(), AlarmState::GaveUp);

    clock.advance(5);
    ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink);
    assert!(hw.since(mark).is_empty());
    assert_eq!(sink.count(|e| *e == AppEvent::AlarmGaveUp), 1);
    assert_eq!(sink.count(|e| *e == AppEvent::AlarmStarted), 1);
    assert_eq!(ctl.state(), LockState::Unlocked);
}

#[test]
fn closing_lid_after_alarm_locks_and_clears() {
    let mut ctl = controller();
    let mut clock = MockClock::at(20, 0, WEDNESDAY);
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::lid_open();
    let mut sink = RecordingSink::new();

    ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink);
    hw.lid_closed = true;
    clock.advance(5);

    assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::Locked);
    assert_eq!(ctl.alarm_state(), AlarmState::Idle);
    assert_eq!(sink.count(|e| *e == AppEvent::AlarmCleared), 1);
}

#[test]
fn missing_phone_also_sounds_alarm() {
    let mut ctl = controller();
    let mut clock = MockClock::at(23, 59, WEDNESDAY);
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::ready();
    hw.phone_present = false;
    let mut sink = RecordingSink::new();

    assert_eq!(
        ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink),
        CycleOutcome::Alarm(AlarmAction::StartSounding)
    );
    assert_eq!(hw.count(HwCall::Lock), 0);
}

#[test]
fn alarm_resets_when_window_closes() {
    let mut ctl = controller();
    let mut clock = MockClock::at(7, 0, THURSDAY);
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::lid_open();
    let mut sink = RecordingSink::new();

    ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink);
    assert!(matches!(ctl.alarm_state(), AlarmState::Sounding { .. }));

    clock.set(8, 11, THURSDAY);
    clock.advance(5);
    assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::NoChange);
    assert_eq!(ctl.alarm_state(), AlarmState::Idle);
    assert_eq!(sink.count(|e| *e == AppEvent::AlarmCleared), 1);
}

#[test]
fn unlocks_when_window_ends() {
    let mut ctl = controller();
    let mut clock = MockClock::at(20, 0, WEDNESDAY);
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink);
    assert_eq!(ctl.state(), LockState::Locked);

    // 08:10 is still inside the weekday window.
    clock.set(8, 10, THURSDAY);
    assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::NoChange);

    clock.set(8, 11, THURSDAY);
    let mark = hw.calls.len();
    assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::Unlocked);
    assert_eq!(
        hw.since(mark),
        &[HwCall::Unlock, HwCall::Play(Tune::Unlock), HwCall::Show(Colour::Green)]
    );
    assert!(sink.events.contains(&AppEvent::Unlocked(Trigger::Schedule)));
}

#[test]
fn weekend_stays_locked_longer() {
    let mut ctl = controller();
    let mut clock = MockClock::at(23, 0, 5);
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink);
    clock.set(9, 30, SATURDAY);
    assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::NoChange);
    assert_eq!(ctl.state(), LockState::Locked);

    clock.set(10, 1, SATURDAY);
    assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::Unlocked);
}

#[test]
fn unsynced_clock_skips_cycle() {
    let mut ctl = controller();
    let mut clock = MockClock::unsynced();
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    assert_eq!(
        ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink),
        CycleOutcome::ClockUnavailable
    );
    assert!(hw.calls.is_empty());
    assert_eq!(cal.queries, 0);
    assert!(sink.events.contains(&AppEvent::CycleSkipped));
}

#[test]
fn every_cycle_reports_status() {
    let mut ctl = controller();
    let mut clock = MockClock::at(20, 0, WEDNESDAY);
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::lid_open();
    let mut sink = RecordingSink::new();

    ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink);
    match sink.last() {
        Some(AppEvent::Status(s)) => {
            assert!(!s.locked);
            assert!(!s.override_active);
            assert_eq!(s.alarm, AlarmStatus::Sounding);
        }
        other => panic!("expected status, got {:?}", other),
    }
    assert_eq!(ctl.cycle_count(), 1);
}
