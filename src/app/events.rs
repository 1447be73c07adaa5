//! Outbound application events.
//!
//! The [`LockController`](super::service::LockController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them: log to serial, push a
//! status notification over BLE, record them in a test.

use serde::Serialize;

use crate::alarm::AlarmState;
use crate::error::ParseError;

use super::commands::OverrideCommand;
use super::service::LockState;

/// Why a lock or unlock transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Time window and calendar.
    Schedule,
    /// Remote override command.
    Remote,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller has started (carries the assumed initial state).
    Started(LockState),

    /// The latch was driven closed.
    Locked(Trigger),

    /// The latch was driven open.
    Unlocked(Trigger),

    /// Lock was due but the lid was open or no phone was present.
    AlarmStarted,

    /// The alarm sounded for its full duration and went quiet.
    AlarmGaveUp,

    /// A pending alarm was reset (box locked or the lock requirement lapsed).
    AlarmCleared,

    /// A force command engaged the override.
    OverrideEngaged(OverrideCommand),

    /// The override was cleared; automatic decisions resume.
    OverrideCleared,

    /// A remote write was rejected.
    OverrideRejected(ParseError),

    /// Wall clock unavailable; no automatic decision this cycle.
    CycleSkipped,

    /// End-of-cycle status snapshot.
    Status(StatusReport),
}

/// Alarm phase as reported to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmStatus {
    Idle,
    Sounding,
    GaveUp,
}

impl From<AlarmState> for AlarmStatus {
    fn from(state: AlarmState) -> Self {
        match state {
            AlarmState::Idle => Self::Idle,
            AlarmState::Sounding { .. } => Self::Sounding,
            AlarmState::GaveUp => Self::GaveUp,
        }
    }
}

/// Compact snapshot pushed to the remote link after every cycle.
///
/// Serialises as `{"locked":true,"override":false,"alarm":"idle"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub locked: bool,
    #[serde(rename = "override")]
    pub override_active: bool,
    pub alarm: AlarmStatus,
}

impl StatusReport {
    /// JSON body for the BLE TX characteristic.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
