//! RESX reset line
//!
//! Level errors from the GPIO are ignored: a broken reset line shows up as a
//! transport failure on the first command after the pulse.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::timing;

/// Owned reset GPIO.
pub struct ResetLine<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> ResetLine<P> {
    /// Take ownership of the pin without touching its level.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Hold the panel in reset.
    pub fn assert(&mut self) {
        let _ = self.pin.set_low();
    }

    /// Reset pulse: high, low, high. Leaves the line high.
    pub fn pulse<D: DelayNs>(&mut self, delay: &mut D) {
        debug!("reset pulse");
        let _ = self.pin.set_high();
        timing::RESET_HIGH.wait(delay);
        let _ = self.pin.set_low();
        timing::RESET_LOW.wait(delay);
        let _ = self.pin.set_high();
        timing::RESET_HIGH.wait(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[test]
    fn pulse_goes_high_low_high() {
        let expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ];
        let mut pin = PinMock::new(&expectations);
        let mut reset = ResetLine::new(pin.clone());
        reset.pulse(&mut NoopDelay::new());
        pin.done();
    }

    #[test]
    fn assert_drives_low() {
        let mut pin = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut reset = ResetLine::new(pin.clone());
        reset.assert();
        pin.done();
    }
}
