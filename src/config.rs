//! System configuration parameters
//!
//! All tunable parameters for the Phonebox.  Loaded once at startup (NVS or
//! defaults) and never reloaded while the control loop runs.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Daily interval during which the box should be locked.
///
/// The window may span midnight (`lock_hour` greater than the unlock hour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockWindowConfig {
    pub lock_hour: u8,
    pub lock_minute: u8,
    pub weekday_unlock_hour: u8,
    pub weekday_unlock_minute: u8,
    pub weekend_unlock_hour: u8,
    pub weekend_unlock_minute: u8,
}

impl LockWindowConfig {
    /// Unlock `(hour, minute)` for the given day kind.
    pub fn unlock_at(&self, is_weekend: bool) -> (u8, u8) {
        if is_weekend {
            (self.weekend_unlock_hour, self.weekend_unlock_minute)
        } else {
            (self.weekday_unlock_hour, self.weekday_unlock_minute)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let pairs = [
            (self.lock_hour, self.lock_minute, "lock time must be 00:00–23:59"),
            (
                self.weekday_unlock_hour,
                self.weekday_unlock_minute,
                "weekday unlock time must be 00:00–23:59",
            ),
            (
                self.weekend_unlock_hour,
                self.weekend_unlock_minute,
                "weekend unlock time must be 00:00–23:59",
            ),
        ];
        for (hour, minute, msg) in pairs {
            if hour > 23 || minute > 59 {
                return Err(ConfigError::ValidationFailed(msg));
            }
        }
        Ok(())
    }
}

impl Default for LockWindowConfig {
    fn default() -> Self {
        Self {
            lock_hour: 19,
            lock_minute: 30,
            weekday_unlock_hour: 8,
            weekday_unlock_minute: 10,
            weekend_unlock_hour: 10,
            weekend_unlock_minute: 0,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockboxConfig {
    // --- Schedule ---
    /// Daily lock window.
    pub window: LockWindowConfig,

    // --- Calendar ---
    /// Minimum age (seconds) before the remote calendar is asked again
    pub calendar_check_interval_secs: u32,
    /// Hard timeout for one calendar request (milliseconds)
    pub calendar_timeout_ms: u32,
    /// Endpoint answering "true"/"false" for today
    pub calendar_url: heapless::String<160>,

    // --- Alarm ---
    /// How long the alarm sounds before giving up (seconds)
    pub alarm_max_duration_secs: u32,

    // --- Timing ---
    /// Control cycle period (milliseconds)
    pub control_cycle_interval_ms: u32,

    // --- Feedback ---
    /// LED strip brightness (0-255)
    pub led_brightness: u8,

    // --- Network ---
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,
    pub sntp_server: heapless::String<64>,
    /// POSIX TZ string applied before reading local time
    pub timezone: heapless::String<48>,
}

impl Default for LockboxConfig {
    fn default() -> Self {
        Self {
            window: LockWindowConfig::default(),

            // Calendar
            calendar_check_interval_secs: 15 * 60,
            calendar_timeout_ms: 10_000,
            calendar_url: heapless::String::new(),

            // Alarm
            alarm_max_duration_secs: 3 * 60,

            // Timing
            control_cycle_interval_ms: 5_000,

            // Feedback
            led_brightness: 50,

            // Network
            wifi_ssid: heapless::String::new(),
            wifi_password: heapless::String::new(),
            sntp_server: heapless_str("pool.ntp.org"),
            timezone: heapless_str("GMT0BST,M3.5.0/1,M10.5.0/2"),
        }
    }
}

impl LockboxConfig {
    pub fn calendar_ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.calendar_check_interval_secs))
    }

    pub fn alarm_max_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.alarm_max_duration_secs))
    }

    pub fn cycle_period(&self) -> core::time::Duration {
        core::time::Duration::from_millis(u64::from(self.control_cycle_interval_ms))
    }

    /// Range-check every field.  Rejects instead of clamping.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()?;
        if !(60..=86_400).contains(&self.calendar_check_interval_secs) {
            return Err(ConfigError::ValidationFailed(
                "calendar_check_interval_secs must be 60–86400",
            ));
        }
        if !(500..=30_000).contains(&self.calendar_timeout_ms) {
            return Err(ConfigError::ValidationFailed(
                "calendar_timeout_ms must be 500–30000",
            ));
        }
        if !(10..=3_600).contains(&self.alarm_max_duration_secs) {
            return Err(ConfigError::ValidationFailed(
                "alarm_max_duration_secs must be 10–3600",
            ));
        }
        if !(1_000..=60_000).contains(&self.control_cycle_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "control_cycle_interval_ms must be 1000–60000",
            ));
        }
        Ok(())
    }
}

fn heapless_str<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    // Defaults are compile-time literals well under capacity.
    let _ = out.push_str(s);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(LockboxConfig::default().validate().is_ok());
    }

    #[test]
    fn reference_window_spans_midnight() {
        let w = LockWindowConfig::default();
        assert!(w.lock_hour > w.weekday_unlock_hour);
        assert!(w.lock_hour > w.weekend_unlock_hour);
        assert_eq!(w.unlock_at(false), (8, 10));
        assert_eq!(w.unlock_at(true), (10, 0));
    }

    #[test]
    fn rejects_out_of_range_clock_values() {
        let mut c = LockboxConfig::default();
        c.window.lock_hour = 24;
        assert!(matches!(c.validate(), Err(ConfigError::ValidationFailed(_))));

        let mut c = LockboxConfig::default();
        c.window.weekend_unlock_minute = 60;
        assert!(matches!(c.validate(), Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn rejects_sub_second_cycle() {
        let mut c = LockboxConfig::default();
        c.control_cycle_interval_ms = 500;
        assert!(c.validate().is_err());
        c.control_cycle_interval_ms = 1_000;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn durations_derive_from_reference_values() {
        let c = LockboxConfig::default();
        assert_eq!(c.calendar_ttl().as_secs(), 900);
        assert_eq!(c.alarm_max_duration().as_secs(), 180);
        assert_eq!(c.cycle_period().as_millis(), 5_000);
    }

    #[test]
    fn serde_roundtrip() {
        let c = LockboxConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: LockboxConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.window, c2.window);
        assert_eq!(c.timezone, c2.timezone);
    }

    #[test]
    fn postcard_roundtrip() {
        let c = LockboxConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: LockboxConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c.window, c2.window);
        assert_eq!(c.alarm_max_duration_secs, c2.alarm_max_duration_secs);
    }
}
