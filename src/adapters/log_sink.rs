//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! The BLE remote link implements the same trait for status notifies.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::Locked(trigger) => {
                info!("LOCK | locked by {:?}", trigger);
            }
            AppEvent::Unlocked(trigger) => {
                info!("LOCK | unlocked by {:?}", trigger);
            }
            AppEvent::AlarmStarted => {
                warn!("ALARM | lock due, lid open or phone missing");
            }
            AppEvent::AlarmGaveUp => {
                warn!("ALARM | not listened to, giving up");
            }
            AppEvent::AlarmCleared => {
                info!("ALARM | cleared");
            }
            AppEvent::OverrideEngaged(cmd) => {
                info!("OVERRIDE | {:?}, schedule suspended", cmd);
            }
            AppEvent::OverrideCleared => {
                info!("OVERRIDE | cleared, schedule resumes");
            }
            AppEvent::OverrideRejected(e) => {
                warn!("OVERRIDE | rejected: {}", e);
            }
            AppEvent::CycleSkipped => {
                warn!("CYCLE | skipped, wall clock not synchronised");
            }
            AppEvent::Status(s) => {
                debug!(
                    "STATUS | locked={} override={} alarm={:?}",
                    s.locked, s.override_active, s.alarm
                );
            }
        }
    }
}
