//! ESP32 time adapter.
//!
//! Implements [`ClockPort`] for the Phonebox.
//!
//! - **`target_os = "espidf"`**: local time from `gettimeofday()` +
//!   `localtime_r()` (the POSIX `TZ` applied by [`configure_timezone`]),
//!   monotonic time from `esp_timer_get_time()`.
//! - **`not(target_os = "espidf")`**: UTC from `std::time::SystemTime`
//!   and `std::time::Instant` for host-side simulation.
//!
//! Local time is reported as unavailable until the wall clock has moved
//! past 2020-01-01, i.e. until SNTP has synchronised at least once.

use embassy_time::Instant;
use log::info;

use crate::app::ports::{ClockPort, ClockReading};
use crate::error::TimeUnavailable;

/// Seconds since the Unix epoch at 2020-01-01T00:00:00Z.
const EPOCH_2020: i64 = 1_577_836_800;

/// Time adapter for the ESP32-S3 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    #[cfg(target_os = "espidf")]
    fn unix_secs(&self) -> Option<i64> {
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut()) } != 0 {
            return None;
        }
        Some(tv.tv_sec as i64)
    }

    #[cfg(not(target_os = "espidf"))]
    fn unix_secs(&self) -> Option<i64> {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs() as i64)
    }

    #[cfg(target_os = "espidf")]
    fn local_reading(&self, secs: i64) -> Option<ClockReading> {
        let secs = secs as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        reading_from_fields(tm.tm_hour, tm.tm_min, tm.tm_wday)
    }

    /// Host simulation has no TZ database; report UTC.
    #[cfg(not(target_os = "espidf"))]
    fn local_reading(&self, secs: i64) -> Option<ClockReading> {
        let day_secs = secs.rem_euclid(86_400);
        let days = secs.div_euclid(86_400);
        // 1970-01-01 was a Thursday (tm_wday 4).
        let weekday = (days + 4).rem_euclid(7);
        reading_from_fields(
            (day_secs / 3_600) as i32,
            ((day_secs % 3_600) / 60) as i32,
            weekday as i32,
        )
    }
}

impl ClockPort for Esp32TimeAdapter {
    fn now(&mut self) -> Result<ClockReading, TimeUnavailable> {
        let secs = self.unix_secs().ok_or(TimeUnavailable)?;
        if secs < EPOCH_2020 {
            return Err(TimeUnavailable);
        }
        self.local_reading(secs).ok_or(TimeUnavailable)
    }

    fn uptime(&self) -> Instant {
        Instant::from_micros(self.uptime_us())
    }
}

fn reading_from_fields(hour: i32, minute: i32, weekday: i32) -> Option<ClockReading> {
    if !(0..=23).contains(&hour) || !(0..=59).contains(&minute) || !(0..=6).contains(&weekday) {
        return None;
    }
    Some(ClockReading::new(hour as u8, minute as u8, weekday as u8))
}

// ── Timezone / SNTP ────────────────────────────────────────────

/// Export the POSIX `TZ` string and re-read it so `localtime_r` applies it.
#[cfg(target_os = "espidf")]
pub fn configure_timezone(tz: &str) {
    // SAFETY: called once from the main task during boot, before any other
    // thread reads the environment.
    unsafe { std::env::set_var("TZ", tz) };
    unsafe { esp_idf_svc::sys::tzset() };
    info!("Timezone set to '{}'", tz);
}

/// Host simulation always reports UTC.
#[cfg(not(target_os = "espidf"))]
pub fn configure_timezone(tz: &str) {
    info!("Timezone '{}' ignored in simulation (UTC)", tz);
}
