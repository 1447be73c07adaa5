//! Peripheral drivers.
//!
//! Each driver is generic over `embedded-hal` 1.0 traits, so the same code
//! runs against `esp-idf-hal` peripherals on the device and against
//! recording fakes in host tests.

pub mod buzzer;
pub mod dotstar;
pub mod servo;
pub mod switch;
