//! Lid and phone micro-switches.
//!
//! Both switches pull their input HIGH when actuated (lid shut, phone
//! seated).  A read error is treated as "not actuated" so a flaky wire can
//! only ever block a lock, never cause one.

use embedded_hal::digital::InputPin;
use log::warn;

pub struct SwitchInput<P> {
    pin: P,
    name: &'static str,
}

impl<P: InputPin> SwitchInput<P> {
    pub fn new(pin: P, name: &'static str) -> Self {
        Self { pin, name }
    }

    /// `true` while the switch is held closed.
    pub fn is_active(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(level) => level,
            Err(e) => {
                warn!("{} switch read failed: {:?}", self.name, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    struct FakePin(Result<bool, ErrorKind>);

    impl ErrorType for FakePin {
        type Error = ErrorKind;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, ErrorKind> {
            self.0
        }

        fn is_low(&mut self) -> Result<bool, ErrorKind> {
            self.0.map(|h| !h)
        }
    }

    #[test]
    fn high_level_means_active() {
        assert!(SwitchInput::new(FakePin(Ok(true)), "lid").is_active());
        assert!(!SwitchInput::new(FakePin(Ok(false)), "lid").is_active());
    }

    #[test]
    fn read_error_means_inactive() {
        assert!(!SwitchInput::new(FakePin(Err(ErrorKind::Other)), "phone").is_active());
    }
}
