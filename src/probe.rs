//! Probe sensor for the homing mark.
//!
//! Reads a raw digital input with a fixed active level. There is no
//! debouncing here; the homing state machine copes with a noisy edge.

use embedded_hal::digital::InputPin;
use serde::Deserialize;

use crate::error::{MotorError, Result};

/// Input level that means "mark present".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pulled-up input, pulled low by the sensor when the mark is present.
    #[default]
    Low,
    /// Input driven high when the mark is present.
    High,
}

/// Binary presence sensor on a digital input.
#[derive(Debug)]
pub struct ProbeSensor<PIN>
where
    PIN: InputPin,
{
    pin: PIN,
    active: ActiveLevel,
}

impl<PIN> ProbeSensor<PIN>
where
    PIN: InputPin,
{
    /// Wrap an input pin with its active level.
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        Self { pin, active }
    }

    /// Active-low probe (asserted = low = present).
    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    /// The configured active level.
    #[inline]
    pub fn active_level(&self) -> ActiveLevel {
        self.active
    }

    /// Sample the input once. `true` iff the mark is under the probe.
    pub fn is_present(&mut self) -> Result<bool> {
        let present = match self.active {
            ActiveLevel::Low => self.pin.is_low(),
            ActiveLevel::High => self.pin.is_high(),
        };
        present.map_err(|_| MotorError::ProbeError.into())
    }

    /// Release the underlying pin.
    pub fn into_inner(self) -> PIN {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[test]
    fn test_active_low_polarity() {
        let pin = PinMock::new(&[
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::High),
        ]);
        let mut probe = ProbeSensor::active_low(pin);

        assert!(probe.is_present().unwrap());
        assert!(!probe.is_present().unwrap());

        probe.into_inner().done();
    }

    #[test]
    fn test_active_high_polarity() {
        let pin = PinMock::new(&[
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
        ]);
        let mut probe = ProbeSensor::new(pin, ActiveLevel::High);

        assert!(probe.is_present().unwrap());
        assert!(!probe.is_present().unwrap());

        probe.into_inner().done();
    }
}
