//! Application service: the hexagonal core.
//!
//! [`LockController`] owns the lock-state belief, the calendar cache, the
//! alarm escalation and the override channel.  It exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire controller testable with mock adapters.
//!
//! ```text
//!      ClockPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!   CalendarPort ──▶ │        LockController        │
//! PreconditionPort ─▶│  window · calendar · alarm   │ ──▶ ActuatorPort
//!   REMOTE_INBOX ──▶ │  override                    │ ──▶ FeedbackPort
//!                    └─────────────────────────────┘
//! ```
//!
//! One [`tick`](LockController::tick) per control cycle:
//!
//! 1. Override active → nothing automatic happens.
//! 2. Clock unavailable → nothing happens.
//! 3. Unlocked: ask the calendar, then the window.  Both say lock →
//!    lock if lid closed and phone present, otherwise escalate the alarm.
//! 4. Locked and outside the window → unlock.

use log::{debug, info, warn};

use crate::alarm::{AlarmAction, AlarmEscalation, AlarmState};
use crate::calendar::CalendarCache;
use crate::config::{LockWindowConfig, LockboxConfig};
use crate::error::ParseError;
use crate::override_channel::{OverrideChannel, OverrideInbox, RawRemoteMessage};
use crate::window::{in_lock_window, is_weekend};

use super::commands::OverrideCommand;
use super::events::{AppEvent, StatusReport, Trigger};
use super::ports::{
    ActuatorPort, CalendarPort, ClockPort, Colour, EventSink, FeedbackPort, PreconditionPort,
    Tune,
};

/// Commanded latch position.
///
/// There is no position sensor, so this is what the controller last told
/// the actuator, not what the latch is physically doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    Locked,
    #[default]
    Unlocked,
}

/// What one control cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Override engaged; automatic evaluation skipped.
    Overridden,
    /// Wall clock unavailable; cycle skipped.
    ClockUnavailable,
    /// Lock transition performed.
    Locked,
    /// Unlock transition performed.
    Unlocked,
    /// Lock due but preconditions unmet.
    Alarm(AlarmAction),
    /// Nothing to do.
    NoChange,
}

// ───────────────────────────────────────────────────────────────
// LockController
// ───────────────────────────────────────────────────────────────

/// The lock controller orchestrates all domain logic.
pub struct LockController {
    window: LockWindowConfig,
    state: LockState,
    calendar: CalendarCache,
    alarm: AlarmEscalation,
    remote: OverrideChannel,
    cycle_count: u64,
}

impl LockController {
    /// Construct the controller from configuration.
    ///
    /// The box is assumed unlocked at boot.
    pub fn new(config: &LockboxConfig) -> Self {
        Self {
            window: config.window,
            state: LockState::Unlocked,
            calendar: CalendarCache::new(config.calendar_ttl()),
            alarm: AlarmEscalation::new(config.alarm_max_duration()),
            remote: OverrideChannel::new(),
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Signal readiness (blue strip) and announce the initial state.
    pub fn start(&mut self, hw: &mut impl FeedbackPort, sink: &mut impl EventSink) {
        hw.show(Colour::Blue);
        sink.emit(&AppEvent::Started(self.state));
        info!("LockController started, assuming {:?}", self.state);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies the precondition, actuator and feedback
    /// ports at once.  This avoids a triple mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        clock: &mut impl ClockPort,
        calendar: &mut impl CalendarPort,
        hw: &mut (impl PreconditionPort + ActuatorPort + FeedbackPort),
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        self.cycle_count += 1;

        let outcome = self.evaluate(clock, calendar, hw, sink);
        debug!("Cycle {}: {:?}", self.cycle_count, outcome);
        sink.emit(&AppEvent::Status(self.status()));
        outcome
    }

    fn evaluate(
        &mut self,
        clock: &mut impl ClockPort,
        calendar: &mut impl CalendarPort,
        hw: &mut (impl PreconditionPort + ActuatorPort + FeedbackPort),
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        // 1. Remote user has taken over
        if self.remote.is_active() {
            debug!("Override active ({:?}), ignoring schedule", self.remote.current());
            return CycleOutcome::Overridden;
        }

        // 2. Local time
        let reading = match clock.now() {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping cycle: {}", e);
                sink.emit(&AppEvent::CycleSkipped);
                return CycleOutcome::ClockUnavailable;
            }
        };
        let now = clock.uptime();
        let weekend = is_weekend(reading.weekday);
        let in_window = in_lock_window(reading.hour, reading.minute, weekend, &self.window);
        debug!(
            "Window check: {:02}:{:02} weekday={} weekend={} in_window={}",
            reading.hour, reading.minute, reading.weekday, weekend, in_window
        );

        match self.state {
            LockState::Unlocked => {
                // 3. Calendar first, then the window.
                if !self.calendar.should_lock_today(now, calendar) || !in_window {
                    self.reset_alarm(sink);
                    return CycleOutcome::NoChange;
                }

                // 4. Lock is due
                if hw.lid_closed() && hw.phone_present() {
                    self.lock(hw, sink, Trigger::Schedule);
                    return CycleOutcome::Locked;
                }

                warn!("Time to lock but lid is open or phone not detected");
                let was_sounding = matches!(self.alarm.state(), AlarmState::Sounding { .. });
                let action = self.alarm.on_precondition_failed(now);
                match action {
                    AlarmAction::StartSounding => {
                        info!("Sounding alarm");
                        sink.emit(&AppEvent::AlarmStarted);
                        sound_alarm(hw);
                    }
                    AlarmAction::KeepSounding => {
                        info!("Sounding alarm");
                        sound_alarm(hw);
                    }
                    AlarmAction::GiveUp if was_sounding => {
                        warn!("Alarm not listened to, giving up");
                        sink.emit(&AppEvent::AlarmGaveUp);
                    }
                    AlarmAction::GiveUp => {}
                }
                CycleOutcome::Alarm(action)
            }
            LockState::Locked => {
                // 5. Window closed
                if in_window {
                    CycleOutcome::NoChange
                } else {
                    self.unlock(hw, sink, Trigger::Schedule);
                    CycleOutcome::Unlocked
                }
            }
        }
    }

    // ── Remote commands ───────────────────────────────────────

    /// Apply one raw message from the remote link.
    ///
    /// Force commands drive the actuator immediately through the same
    /// idempotent path as scheduled transitions.  Rejected messages change
    /// nothing.
    pub fn handle_remote(
        &mut self,
        msg: &RawRemoteMessage,
        hw: &mut (impl ActuatorPort + FeedbackPort),
        sink: &mut impl EventSink,
    ) -> Result<OverrideCommand, ParseError> {
        let cmd = match self.remote.receive(msg) {
            Ok(cmd) => cmd,
            Err(e) => {
                sink.emit(&AppEvent::OverrideRejected(e));
                return Err(e);
            }
        };

        match cmd {
            OverrideCommand::ForceLock => {
                sink.emit(&AppEvent::OverrideEngaged(cmd));
                self.lock(hw, sink, Trigger::Remote);
            }
            OverrideCommand::ForceUnlock => {
                sink.emit(&AppEvent::OverrideEngaged(cmd));
                self.unlock(hw, sink, Trigger::Remote);
            }
            OverrideCommand::ClearOverride => sink.emit(&AppEvent::OverrideCleared),
            OverrideCommand::None => {}
        }
        Ok(cmd)
    }

    /// Take whatever the remote link left in `inbox` and apply it.
    ///
    /// Returns `None` when the inbox was empty.
    pub fn drain_inbox(
        &mut self,
        inbox: &OverrideInbox,
        hw: &mut (impl ActuatorPort + FeedbackPort),
        sink: &mut impl EventSink,
    ) -> Option<Result<OverrideCommand, ParseError>> {
        let msg = inbox.take()?;
        Some(self.handle_remote(&msg, hw, sink))
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn alarm_state(&self) -> AlarmState {
        self.alarm.state()
    }

    pub fn override_active(&self) -> bool {
        self.remote.is_active()
    }

    pub fn last_override(&self) -> OverrideCommand {
        self.remote.current()
    }

    /// Total control cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            locked: self.state == LockState::Locked,
            override_active: self.remote.is_active(),
            alarm: self.alarm.state().into(),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn lock(
        &mut self,
        hw: &mut (impl ActuatorPort + FeedbackPort),
        sink: &mut impl EventSink,
        trigger: Trigger,
    ) {
        if self.state == LockState::Locked {
            info!("Asked to lock, but already locked, ignoring");
            return;
        }
        info!("Locking lid ({:?})", trigger);
        hw.lock();
        self.state = LockState::Locked;
        hw.play(Tune::Lock);
        hw.show(Colour::Red);
        self.reset_alarm(sink);
        sink.emit(&AppEvent::Locked(trigger));
    }

    fn unlock(
        &mut self,
        hw: &mut (impl ActuatorPort + FeedbackPort),
        sink: &mut impl EventSink,
        trigger: Trigger,
    ) {
        if self.state == LockState::Unlocked {
            info!("Asked to unlock, but already unlocked, ignoring");
            return;
        }
        info!("Unlocking lid ({:?})", trigger);
        hw.unlock();
        self.state = LockState::Unlocked;
        hw.play(Tune::Unlock);
        hw.show(Colour::Green);
        sink.emit(&AppEvent::Unlocked(trigger));
    }

    fn reset_alarm(&mut self, sink: &mut impl EventSink) {
        if !self.alarm.is_idle() {
            self.alarm.on_precondition_satisfied();
            sink.emit(&AppEvent::AlarmCleared);
        }
    }
}

fn sound_alarm(hw: &mut impl FeedbackPort) {
    hw.show(Colour::Red);
    hw.play(Tune::Alarm);
}
