//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the switches, servo, LED strip and buzzer, exposing them through
//! [`PreconditionPort`], [`ActuatorPort`] and [`FeedbackPort`].  This is
//! the only module in the system that touches actual hardware.  The
//! drivers are generic over `embedded-hal`, so host tests plug in fakes.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal::spi::SpiBus;

use crate::app::ports::{ActuatorPort, Colour, FeedbackPort, PreconditionPort, Tune};
use crate::drivers::buzzer::Buzzer;
use crate::drivers::dotstar::DotStarStrip;
use crate::drivers::servo::ServoDriver;
use crate::drivers::switch::SwitchInput;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<Pwm, ServoDelay, Lid, Phone, Spi, Piezo, PiezoDelay> {
    servo: ServoDriver<Pwm, ServoDelay>,
    lid: SwitchInput<Lid>,
    phone: SwitchInput<Phone>,
    strip: DotStarStrip<Spi>,
    buzzer: Buzzer<Piezo, PiezoDelay>,
}

impl<Pwm, ServoDelay, Lid, Phone, Spi, Piezo, PiezoDelay>
    HardwareAdapter<Pwm, ServoDelay, Lid, Phone, Spi, Piezo, PiezoDelay>
where
    Pwm: SetDutyCycle,
    ServoDelay: DelayNs,
    Lid: InputPin,
    Phone: InputPin,
    Spi: SpiBus,
    Piezo: OutputPin,
    PiezoDelay: DelayNs,
{
    pub fn new(
        servo: ServoDriver<Pwm, ServoDelay>,
        lid: SwitchInput<Lid>,
        phone: SwitchInput<Phone>,
        strip: DotStarStrip<Spi>,
        buzzer: Buzzer<Piezo, PiezoDelay>,
    ) -> Self {
        Self {
            servo,
            lid,
            phone,
            strip,
            buzzer,
        }
    }
}

// ── PreconditionPort implementation ───────────────────────────

impl<Pwm, ServoDelay, Lid, Phone, Spi, Piezo, PiezoDelay> PreconditionPort
    for HardwareAdapter<Pwm, ServoDelay, Lid, Phone, Spi, Piezo, PiezoDelay>
where
    Lid: InputPin,
    Phone: InputPin,
{
    fn lid_closed(&mut self) -> bool {
        self.lid.is_active()
    }

    fn phone_present(&mut self) -> bool {
        self.phone.is_active()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<Pwm, ServoDelay, Lid, Phone, Spi, Piezo, PiezoDelay> ActuatorPort
    for HardwareAdapter<Pwm, ServoDelay, Lid, Phone, Spi, Piezo, PiezoDelay>
where
    Pwm: SetDutyCycle,
    ServoDelay: DelayNs,
{
    fn lock(&mut self) {
        self.servo.close();
    }

    fn unlock(&mut self) {
        self.servo.open();
    }
}

// ── FeedbackPort implementation ───────────────────────────────

impl<Pwm, ServoDelay, Lid, Phone, Spi, Piezo, PiezoDelay> FeedbackPort
    for HardwareAdapter<Pwm, ServoDelay, Lid, Phone, Spi, Piezo, PiezoDelay>
where
    Spi: SpiBus,
    Piezo: OutputPin,
    PiezoDelay: DelayNs,
{
    fn show(&mut self, colour: Colour) {
        self.strip.fill(colour.rgb());
        self.strip.show();
    }

    fn play(&mut self, tune: Tune) {
        self.buzzer.play(tune);
    }
}
