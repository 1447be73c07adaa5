//! APA102 ("DotStar") LED strip over SPI.
//!
//! ```text
//!   start frame  │ LED 0          │ … │ LED N-1        │ end frame
//!   00 00 00 00  │ FF  B  G  R    │   │ FF  B  G  R    │ FF × ⌈N/16⌉
//! ```
//!
//! Global brightness is applied by scaling each channel in software and
//! leaving the 5-bit hardware brightness field at maximum.  Lower hardware
//! brightness makes the LEDs' own PWM flicker on camera.

use embedded_hal::spi::SpiBus;
use log::warn;

/// LEDs on the Phonebox lid ring.
pub const STRIP_LEN: usize = 20;

const START_FRAME: [u8; 4] = [0x00; 4];
/// 0b111 marker + 5-bit global brightness at max.
const LED_HEADER: u8 = 0xFF;

pub struct DotStarStrip<S, const N: usize = STRIP_LEN> {
    spi: S,
    brightness: u8,
    pixels: [(u8, u8, u8); N],
}

impl<S: SpiBus, const N: usize> DotStarStrip<S, N> {
    pub fn new(spi: S, brightness: u8) -> Self {
        Self {
            spi,
            brightness,
            pixels: [(0, 0, 0); N],
        }
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    /// Set every LED to `(r, g, b)` without pushing to the strip.
    pub fn fill(&mut self, rgb: (u8, u8, u8)) {
        self.pixels = [rgb; N];
    }

    /// Push the pixel buffer to the strip.
    pub fn show(&mut self) {
        if let Err(e) = self.write_frame() {
            warn!("DotStar: SPI write failed: {:?}", e);
        }
    }

    pub fn pixels(&self) -> &[(u8, u8, u8); N] {
        &self.pixels
    }

    fn write_frame(&mut self) -> Result<(), S::Error> {
        self.spi.write(&START_FRAME)?;
        for &(r, g, b) in &self.pixels {
            let frame = [
                LED_HEADER,
                scale(b, self.brightness),
                scale(g, self.brightness),
                scale(r, self.brightness),
            ];
            self.spi.write(&frame)?;
        }
        for _ in 0..end_frame_len(N) {
            self.spi.write(&[0xFF])?;
        }
        self.spi.flush()
    }
}

/// Bytes of trailing clock needed to latch `n` LEDs (one bit per two LEDs).
pub const fn end_frame_len(n: usize) -> usize {
    n.div_ceil(16)
}

/// Scale a channel by `brightness / 256`, rounding so that 255 keeps full
/// intensity.
pub fn scale(channel: u8, brightness: u8) -> u8 {
    ((u16::from(channel) * (u16::from(brightness) + 1)) >> 8) as u8
}
