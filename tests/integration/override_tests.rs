//! Remote override flow: inbox → controller → actuator.

use crate::mock_hw::{HwCall, MockCalendar, MockClock, MockHardware, RecordingSink};
use phonebox::app::commands::OverrideCommand;
use phonebox::app::events::{AppEvent, Trigger};
use phonebox::app::service::{CycleOutcome, LockController, LockState};
use phonebox::config::LockboxConfig;
use phonebox::error::ParseError;
use phonebox::override_channel::{OverrideInbox, RawRemoteMessage};

const TUESDAY: u8 = 2;

fn post(inbox: &OverrideInbox, bytes: &[u8]) {
    inbox.post(RawRemoteMessage::from_bytes(bytes).unwrap());
}

#[test]
fn empty_inbox_does_nothing() {
    let mut ctl = LockController::new(&LockboxConfig::default());
    let inbox = OverrideInbox::new();
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    assert_eq!(ctl.drain_inbox(&inbox, &mut hw, &mut sink), None);
    assert!(hw.calls.is_empty());
    assert!(sink.events.is_empty());
}

#[test]
fn force_lock_suspends_schedule_until_cleared() {
    let mut ctl = LockController::new(&LockboxConfig::default());
    let inbox = OverrideInbox::new();
    let mut clock = MockClock::at(12, 0, TUESDAY);
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    post(&inbox, b"L\n");
    assert_eq!(
        ctl.drain_inbox(&inbox, &mut hw, &mut sink),
        Some(Ok(OverrideCommand::ForceLock))
    );
    assert_eq!(ctl.state(), LockState::Locked);
    assert_eq!(hw.count(HwCall::Lock), 1);
    assert!(sink.events.contains(&AppEvent::OverrideEngaged(OverrideCommand::ForceLock)));
    assert!(sink.events.contains(&AppEvent::Locked(Trigger::Remote)));

    // Midday is outside the window, but the override holds.
    for _ in 0..3 {
        assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::Overridden);
        clock.advance(5);
    }
    assert_eq!(ctl.state(), LockState::Locked);
    assert_eq!(hw.count(HwCall::Unlock), 0);
    assert_eq!(cal.queries, 0);

    post(&inbox, b"C");
    assert_eq!(
        ctl.drain_inbox(&inbox, &mut hw, &mut sink),
        Some(Ok(OverrideCommand::ClearOverride))
    );
    // Clearing alone does not move the latch.
    assert_eq!(ctl.state(), LockState::Locked);
    assert!(!ctl.override_active());

    assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::Unlocked);
    assert!(sink.events.contains(&AppEvent::Unlocked(Trigger::Schedule)));
}

#[test]
fn force_unlock_releases_locked_box() {
    let mut ctl = LockController::new(&LockboxConfig::default());
    let inbox = OverrideInbox::new();
    let mut clock = MockClock::at(22, 0, TUESDAY);
    let mut cal = MockCalendar::answering(Ok(true));
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink);
    assert_eq!(ctl.state(), LockState::Locked);

    post(&inbox, b"U\r\n");
    ctl.drain_inbox(&inbox, &mut hw, &mut sink);
    assert_eq!(ctl.state(), LockState::Unlocked);
    assert!(ctl.status().override_active);

    // Inside the window with preconditions met, yet it stays open.
    assert_eq!(ctl.tick(&mut clock, &mut cal, &mut hw, &mut sink), CycleOutcome::Overridden);
    assert_eq!(hw.count(HwCall::Lock), 1);
}

#[test]
fn repeated_force_is_idempotent() {
    let mut ctl = LockController::new(&LockboxConfig::default());
    let inbox = OverrideInbox::new();
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    post(&inbox, b"L");
    ctl.drain_inbox(&inbox, &mut hw, &mut sink);
    post(&inbox, b"L");
    ctl.drain_inbox(&inbox, &mut hw, &mut sink);

    assert_eq!(hw.count(HwCall::Lock), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Locked(_))), 1);
}

#[test]
fn unknown_command_is_rejected_without_effect() {
    let mut ctl = LockController::new(&LockboxConfig::default());
    let inbox = OverrideInbox::new();
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    post(&inbox, b"X");
    assert_eq!(
        ctl.drain_inbox(&inbox, &mut hw, &mut sink),
        Some(Err(ParseError::Unrecognized))
    );
    assert!(hw.calls.is_empty());
    assert!(!ctl.override_active());
    assert_eq!(
        sink.events,
        vec![AppEvent::OverrideRejected(ParseError::Unrecognized)]
    );
}

#[test]
fn lowercase_command_is_rejected() {
    let mut ctl = LockController::new(&LockboxConfig::default());
    let inbox = OverrideInbox::new();
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    post(&inbox, b"l");
    assert_eq!(
        ctl.drain_inbox(&inbox, &mut hw, &mut sink),
        Some(Err(ParseError::Unrecognized))
    );
    assert_eq!(ctl.state(), LockState::Unlocked);
}

#[test]
fn latest_message_wins_between_cycles() {
    let mut ctl = LockController::new(&LockboxConfig::default());
    let inbox = OverrideInbox::new();
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    post(&inbox, b"L");
    post(&inbox, b"U");
    assert_eq!(
        ctl.drain_inbox(&inbox, &mut hw, &mut sink),
        Some(Ok(OverrideCommand::ForceUnlock))
    );
    assert!(hw.calls.is_empty());
    assert_eq!(ctl.drain_inbox(&inbox, &mut hw, &mut sink), None);
}

#[test]
fn rejected_message_keeps_existing_override() {
    let mut ctl = LockController::new(&LockboxConfig::default());
    let inbox = OverrideInbox::new();
    let mut hw = MockHardware::ready();
    let mut sink = RecordingSink::new();

    post(&inbox, b"L");
    ctl.drain_inbox(&inbox, &mut hw, &mut sink);
    post(&inbox, b"");
    assert_eq!(
        ctl.drain_inbox(&inbox, &mut hw, &mut sink),
        Some(Err(ParseError::Empty))
    );
    assert!(ctl.override_active());
    assert_eq!(ctl.last_override(), OverrideCommand::ForceLock);
}
