//! Phonebox firmware library.
//!
//! A scheduled lockbox for a phone: every control cycle the box decides,
//! from local time, a remote calendar and two switches, whether to latch
//! its lid, sound an alarm or release it.  A BLE remote can override the
//! schedule.
//!
//! Exposes the pure-logic modules for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod alarm;
pub mod app;
pub mod calendar;
pub mod config;
pub mod error;
pub mod override_channel;
pub mod pins;
pub mod window;

pub mod adapters;
pub mod drivers;

mod esp_link_shims;
