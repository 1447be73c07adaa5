//! GPIO pin assignments for the Phonebox controller board.
//!
//! Every peripheral is wired in `main.rs` from these constants rather than
//! hard-coded numbers.

// ---------------------------------------------------------------------------
// Latch servo
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the latch servo (50 Hz).
pub const SERVO_GPIO: i32 = 10;
/// Servo frame rate.
pub const SERVO_PWM_HZ: u32 = 50;

// ---------------------------------------------------------------------------
// DotStar (APA102) LED strip, driven over SPI
// ---------------------------------------------------------------------------

/// SPI MOSI → strip DIN.
pub const LED_DATA_GPIO: i32 = 11;
/// SPI SCLK → strip CIN.
pub const LED_CLOCK_GPIO: i32 = 12;
/// SPI clock for the strip.
pub const LED_SPI_HZ: u32 = 4_000_000;

// ---------------------------------------------------------------------------
// Piezo buzzer
// ---------------------------------------------------------------------------

pub const PIEZO_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Precondition switches (active HIGH)
// ---------------------------------------------------------------------------

/// Microswitch under the phone cradle.
pub const PHONE_SWITCH_GPIO: i32 = 6;
/// Contact switch on the lid.
pub const LID_SWITCH_GPIO: i32 = 9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pin_is_assigned_twice() {
        let pins = [
            SERVO_GPIO,
            LED_DATA_GPIO,
            LED_CLOCK_GPIO,
            PIEZO_GPIO,
            PHONE_SWITCH_GPIO,
            LID_SWITCH_GPIO,
        ];
        for (i, a) in pins.iter().enumerate() {
            for b in &pins[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
