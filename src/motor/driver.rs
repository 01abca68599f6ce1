//! Stepper motor driver.
//!
//! Generic over embedded-hal 1.0 pin types with type-state stepping authority.

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Degrees, Steps};
use crate::error::{MotorError, Result};
use crate::motion::Direction;

use super::builder::StepperMotorBuilder;
use super::position::Position;
use super::state::{Homing, Idle, MotorState};

/// High and low time of one STEP pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseTiming {
    /// Time the STEP pin is held high, in microseconds.
    pub high_us: u32,
    /// Time the STEP pin is held low afterwards, in microseconds.
    pub low_us: u32,
}

impl PulseTiming {
    /// Duration of one complete pulse.
    #[inline]
    pub fn period_us(&self) -> u32 {
        self.high_us.saturating_add(self.low_us)
    }
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self {
            high_us: crate::config::DEFAULT_PULSE_US,
            low_us: crate::config::DEFAULT_PULSE_US,
        }
    }
}

/// Stepper motor driver with type-state stepping authority.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider (must implement `DelayNs`)
/// - `STATE`: Who holds stepping authority (defaults to `Idle`)
///
/// The value itself is the stepping capability: whoever owns it may pulse
/// the motor, and moving it into a homing session keeps everyone else out.
pub struct StepperMotor<STEP, DIR, DELAY, STATE = Idle>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    STATE: MotorState,
{
    /// STEP pin (rising edge moves one step).
    step_pin: STEP,

    /// DIR pin (level = direction XOR inversion).
    dir_pin: DIR,

    /// Delay provider for pulse timing and yields.
    delay: DELAY,

    /// Current signed position.
    position: Position,

    /// Last level written to the DIR pin (cached to avoid unnecessary pin writes).
    dir_level: Option<bool>,

    /// Motor name for logging/debugging.
    name: heapless::String<32>,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Fixed STEP pulse timing.
    pulse: PulseTiming,

    /// Type-state marker.
    _state: PhantomData<STATE>,
}

impl<STEP, DIR, DELAY, STATE> StepperMotor<STEP, DIR, DELAY, STATE>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    STATE: MotorState,
{
    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get current position in steps.
    #[inline]
    pub fn position_steps(&self) -> Steps {
        self.position.steps()
    }

    /// Get the current angle within one revolution.
    #[inline]
    pub fn angle(&self) -> Degrees {
        self.position.angle()
    }

    /// Get steps per output revolution.
    #[inline]
    pub fn steps_per_revolution(&self) -> u32 {
        self.position.steps_per_revolution()
    }

    /// Whether the DIR pin logic is currently inverted.
    #[inline]
    pub fn invert_direction(&self) -> bool {
        self.invert_direction
    }

    /// Get the STEP pulse timing.
    #[inline]
    pub fn pulse_timing(&self) -> PulseTiming {
        self.pulse
    }

    /// Who holds stepping authority, for logs.
    #[inline]
    pub fn state_name(&self) -> &'static str {
        STATE::NAME
    }

    /// Issue one step pulse in `direction`.
    ///
    /// Sets DIR, holds STEP high for the configured high time, then low for
    /// the low time, and only then returns. With inversion active the shaft
    /// turns the other way, and the position follows the shaft.
    pub fn step(&mut self, direction: Direction) -> Result<()> {
        self.set_direction(direction)?;

        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(self.pulse.high_us);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(self.pulse.low_us);

        let turned = if self.invert_direction {
            direction.reverse()
        } else {
            direction
        };
        self.position.advance(turned);
        Ok(())
    }

    /// Block for `us` microseconds using the motor's delay provider.
    #[inline]
    pub fn pause_us(&mut self, us: u32) {
        if us > 0 {
            self.delay.delay_us(us);
        }
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        let level = direction.pin_level(self.invert_direction);
        if self.dir_level == Some(level) {
            return Ok(());
        }

        if level {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.dir_level = Some(level);
        Ok(())
    }

    fn transition<NEXT>(self) -> StepperMotor<STEP, DIR, DELAY, NEXT>
    where
        NEXT: MotorState,
    {
        StepperMotor {
            step_pin: self.step_pin,
            dir_pin: self.dir_pin,
            delay: self.delay,
            position: self.position,
            dir_level: self.dir_level,
            name: self.name,
            invert_direction: self.invert_direction,
            pulse: self.pulse,
            _state: PhantomData,
        }
    }
}

impl<STEP, DIR, DELAY> StepperMotor<STEP, DIR, DELAY, Idle>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new motor in the Idle state.
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
        steps_per_revolution: u32,
        name: heapless::String<32>,
        invert_direction: bool,
        pulse: PulseTiming,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            position: Position::new(steps_per_revolution),
            dir_level: None,
            name,
            invert_direction,
            pulse,
            _state: PhantomData,
        }
    }

    /// Start building a motor.
    pub fn builder() -> StepperMotorBuilder<STEP, DIR, DELAY> {
        StepperMotorBuilder::new()
    }

    /// Set direction inversion.
    pub fn set_invert_direction(&mut self, invert: bool) {
        self.invert_direction = invert;
    }

    /// Flip direction inversion and return the new setting.
    pub fn toggle_invert_direction(&mut self) -> bool {
        self.invert_direction = !self.invert_direction;
        self.invert_direction
    }

    /// Overwrite the current position.
    pub fn set_position(&mut self, steps: Steps) {
        self.position.set_steps(steps);
    }

    /// Hand stepping authority to a homing session.
    pub fn into_homing(self) -> StepperMotor<STEP, DIR, DELAY, Homing> {
        self.transition()
    }
}

impl<STEP, DIR, DELAY> StepperMotor<STEP, DIR, DELAY, Homing>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Make the current position the zero reference.
    pub fn set_origin(&mut self) {
        self.position.set_origin();
    }

    /// End the homing session and give stepping authority back.
    pub fn finish(self) -> StepperMotor<STEP, DIR, DELAY, Idle> {
        self.transition()
    }
}
