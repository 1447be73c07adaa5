//! Escalating alarm for a lock that is due but cannot happen.
//!
//! ```text
//!   Idle ──fail──▶ Sounding{started_at} ──fail, ≥ max──▶ GaveUp
//!    ▲                  │                                  │
//!    └─────satisfied────┴──────────────satisfied───────────┘
//! ```
//!
//! The alarm does not schedule itself: each control cycle that finds the
//! preconditions unmet calls [`AlarmEscalation::on_precondition_failed`],
//! so the cycle period is the retry cadence.

use embassy_time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmState {
    Idle,
    Sounding { started_at: Instant },
    GaveUp,
}

/// What the controller should do about the alarm this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmAction {
    /// First failure: start alarm feedback.
    StartSounding,
    /// Still within the alarm duration: repeat alarm feedback.
    KeepSounding,
    /// Duration exhausted: stay quiet.
    GiveUp,
}

pub struct AlarmEscalation {
    state: AlarmState,
    max_duration: Duration,
}

impl AlarmEscalation {
    pub const fn new(max_duration: Duration) -> Self {
        Self {
            state: AlarmState::Idle,
            max_duration,
        }
    }

    /// Record a cycle in which the lock was due but preconditions failed.
    pub fn on_precondition_failed(&mut self, now: Instant) -> AlarmAction {
        match self.state {
            AlarmState::Idle => {
                self.state = AlarmState::Sounding { started_at: now };
                AlarmAction::StartSounding
            }
            AlarmState::Sounding { started_at } => {
                if now.saturating_duration_since(started_at) < self.max_duration {
                    AlarmAction::KeepSounding
                } else {
                    self.state = AlarmState::GaveUp;
                    AlarmAction::GiveUp
                }
            }
            AlarmState::GaveUp => AlarmAction::GiveUp,
        }
    }

    /// Box locked, or the lock requirement lapsed.  Back to Idle.
    pub fn on_precondition_satisfied(&mut self) {
        self.state = AlarmState::Idle;
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == AlarmState::Idle
    }
}
