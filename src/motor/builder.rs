//! Builder pattern for StepperMotor.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Microsteps;
use crate::config::{is_positive, validate_config, MotorConfig, SystemConfig};
use crate::error::{ConfigError, Error, Result};

use super::driver::{PulseTiming, StepperMotor};
use super::state::Idle;

/// Builder for creating StepperMotor instances.
pub struct StepperMotorBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    name: Option<heapless::String<32>>,
    steps_per_revolution: Option<u16>,
    microsteps: Option<Microsteps>,
    gear_ratio: f32,
    invert_direction: bool,
    pulse: PulseTiming,
}

impl<STEP, DIR, DELAY> Default for StepperMotorBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, DELAY> StepperMotorBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            delay: None,
            name: None,
            steps_per_revolution: None,
            microsteps: None,
            gear_ratio: 1.0,
            invert_direction: false,
            pulse: PulseTiming::default(),
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the motor name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = heapless::String::try_from(name).ok();
        self
    }

    /// Set steps per revolution (base motor steps before microstepping).
    pub fn steps_per_revolution(mut self, steps: u16) -> Self {
        self.steps_per_revolution = Some(steps);
        self
    }

    /// Set microstep configuration.
    pub fn microsteps(mut self, microsteps: Microsteps) -> Self {
        self.microsteps = Some(microsteps);
        self
    }

    /// Set gear ratio.
    pub fn gear_ratio(mut self, ratio: f32) -> Self {
        self.gear_ratio = ratio;
        self
    }

    /// Set initial direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set STEP pulse high and low time in microseconds.
    pub fn pulse_us(mut self, high_us: u32, low_us: u32) -> Self {
        self.pulse = PulseTiming { high_us, low_us };
        self
    }

    /// Configure from a MotorConfig.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Self {
        self.name = Some(config.name.clone());
        self.steps_per_revolution = Some(config.steps_per_revolution);
        self.microsteps = Some(config.microsteps);
        self.gear_ratio = config.gear_ratio;
        self.invert_direction = config.invert_direction;
        self.pulse = PulseTiming {
            high_us: config.pulse_high_us,
            low_us: config.pulse_low_us,
        };
        self
    }

    /// Configure from the `[motor]` section of a SystemConfig.
    pub fn from_config(self, config: &SystemConfig) -> Result<Self> {
        validate_config(config)?;
        Ok(self.from_motor_config(&config.motor))
    }

    /// Build an idle motor.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a pin, the delay or the step count is
    /// missing, if the pulse timing is zero, or if the gear ratio is not a
    /// finite positive number.
    pub fn build(self) -> Result<StepperMotor<STEP, DIR, DELAY, Idle>> {
        let base_steps = require(self.steps_per_revolution, "steps_per_revolution")?;
        if base_steps == 0 {
            return Err(ConfigError::InvalidStepsPerRevolution(base_steps).into());
        }
        if !is_positive(self.gear_ratio) {
            return Err(ConfigError::InvalidGearRatio(self.gear_ratio).into());
        }
        if let Some(zero) = [self.pulse.high_us, self.pulse.low_us]
            .into_iter()
            .find(|&us| us == 0)
        {
            return Err(ConfigError::InvalidPulseWidth(zero).into());
        }

        let microsteps = self.microsteps.unwrap_or_default();
        let steps_per_revolution =
            (f32::from(base_steps) * f32::from(microsteps.value()) * self.gear_ratio) as u32;

        Ok(StepperMotor::new(
            require(self.step_pin, "step_pin")?,
            require(self.dir_pin, "dir_pin")?,
            require(self.delay, "delay")?,
            steps_per_revolution,
            self.name.unwrap_or_else(default_name),
            self.invert_direction,
            self.pulse,
        ))
    }
}

fn require<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| {
        let mut msg = heapless::String::<128>::new();
        let _ = write!(msg, "{} is required", field);
        Error::Config(ConfigError::ParseError(msg))
    })
}

fn default_name() -> heapless::String<32> {
    heapless::String::try_from("motor").unwrap_or_default()
}
