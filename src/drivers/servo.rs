//! Hobby servo driving the lid latch.
//!
//! 50 Hz PWM, pulse width 500–2500 µs mapped linearly onto 0–180°.  The
//! latch is swept one degree at a time with a fixed settle delay so the
//! horn does not slam.
//!
//! ```text
//!   unlocked  5° ───── 1°/10 ms ─────▶ 180°  locked
//! ```
//!
//! Generic over `embedded-hal` 1.0 [`SetDutyCycle`] + [`DelayNs`]; on
//! ESP-IDF the PWM is an LEDC channel configured for 50 Hz.

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

/// PWM period at 50 Hz.
pub const PERIOD_US: u32 = 20_000;
pub const MIN_PULSE_US: u32 = 500;
pub const MAX_PULSE_US: u32 = 2_500;

/// Latch fully open.
pub const UNLOCKED_DEG: u8 = 5;
/// Latch fully closed.
pub const LOCKED_DEG: u8 = 180;
/// Settle time per degree step.
pub const STEP_DELAY_MS: u32 = 10;

pub struct ServoDriver<P, D> {
    pwm: P,
    delay: D,
    position: u8,
}

impl<P, D> ServoDriver<P, D>
where
    P: SetDutyCycle,
    D: DelayNs,
{
    /// Wrap the PWM channel.  Position is assumed to be the unlocked end.
    pub fn new(pwm: P, delay: D) -> Self {
        Self {
            pwm,
            delay,
            position: UNLOCKED_DEG,
        }
    }

    /// Sweep to `target` degrees, one degree per [`STEP_DELAY_MS`].
    pub fn sweep_to(&mut self, target: u8) {
        let target = target.min(180);
        while self.position != target {
            if self.position < target {
                self.position += 1;
            } else {
                self.position -= 1;
            }
            self.write(self.position);
            self.delay.delay_ms(STEP_DELAY_MS);
        }
    }

    /// Sweep from [`UNLOCKED_DEG`] to [`LOCKED_DEG`].
    pub fn close(&mut self) {
        self.position = UNLOCKED_DEG;
        self.sweep_to(LOCKED_DEG);
    }

    /// Sweep from [`LOCKED_DEG`] to [`UNLOCKED_DEG`].
    pub fn open(&mut self) {
        self.position = LOCKED_DEG;
        self.sweep_to(UNLOCKED_DEG);
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    fn write(&mut self, degrees: u8) {
        let pulse = pulse_us(degrees);
        // duty = pulse / period, expressed against the channel's max duty.
        if let Err(e) = self.pwm.set_duty_cycle_fraction(pulse as u16, PERIOD_US as u16) {
            warn!("Servo: PWM write failed: {:?}", e);
        }
    }
}

/// Pulse width for an angle, clamped to 0–180°.
pub fn pulse_us(degrees: u8) -> u32 {
    let degrees = u32::from(degrees.min(180));
    MIN_PULSE_US + degrees * (MAX_PULSE_US - MIN_PULSE_US) / 180
}
