//! Piezo buzzer melodies.
//!
//! The piezo is driven by toggling a GPIO at the note frequency.  Each note
//! lasts `1000 / divisor` ms (4 = quarter, 8 = eighth) and is followed by
//! 30% of its length in silence so consecutive notes stay distinct.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::Tune;

// Note frequencies (Hz); 0 is a rest.
const REST: u16 = 0;
const NOTE_G3: u16 = 196;
const NOTE_A3: u16 = 220;
const NOTE_B3: u16 = 247;
const NOTE_C4: u16 = 262;

/// `(frequency_hz, duration_divisor)`
pub type Note = (u16, u16);

pub const LOCK_MELODY: [Note; 8] = [
    (NOTE_C4, 4),
    (NOTE_B3, 4),
    (REST, 4),
    (NOTE_G3, 4),
    (NOTE_A3, 4),
    (NOTE_G3, 8),
    (NOTE_G3, 8),
    (NOTE_C4, 4),
];

pub const UNLOCK_MELODY: [Note; 8] = [
    (NOTE_C4, 4),
    (NOTE_G3, 8),
    (NOTE_G3, 8),
    (NOTE_A3, 4),
    (NOTE_G3, 4),
    (REST, 4),
    (NOTE_B3, 4),
    (NOTE_C4, 4),
];

pub const ALARM_MELODY: [Note; 8] = [(NOTE_C4, 4); 8];

pub fn melody(tune: Tune) -> &'static [Note] {
    match tune {
        Tune::Lock => &LOCK_MELODY,
        Tune::Unlock => &UNLOCK_MELODY,
        Tune::Alarm => &ALARM_MELODY,
    }
}

/// Sounding time of one note in ms.
pub const fn note_ms(divisor: u16) -> u32 {
    1000 / divisor as u32
}

/// Silence after a note in ms (30% of its length).
pub const fn gap_ms(divisor: u16) -> u32 {
    note_ms(divisor) * 3 / 10
}

pub struct Buzzer<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Buzzer<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Play a melody to completion (blocking).
    pub fn play(&mut self, tune: Tune) {
        for &(freq, divisor) in melody(tune) {
            if let Err(e) = self.tone(freq, note_ms(divisor)) {
                warn!("Buzzer: pin write failed: {:?}", e);
                return;
            }
            self.delay.delay_ms(gap_ms(divisor));
        }
    }

    fn tone(&mut self, freq: u16, ms: u32) -> Result<(), P::Error> {
        if freq == REST {
            self.delay.delay_ms(ms);
            return Ok(());
        }
        let half_period_us = 500_000 / u32::from(freq);
        let cycles = u32::from(freq) * ms / 1000;
        for _ in 0..cycles {
            self.pin.set_high()?;
            self.delay.delay_us(half_period_us);
            self.pin.set_low()?;
            self.delay.delay_us(half_period_us);
        }
        self.pin.set_low()
    }
}
