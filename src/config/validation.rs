//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Motor geometry and pulse timing are non-zero
/// - Gear ratio, speed and acceleration limits are finite and positive
/// - Report cadence and baud rate are non-zero
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    validate_motor(&config.motor)?;

    if config.report.interval_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidReportInterval(
            config.report.interval_ms,
        )));
    }

    if config.serial.baud_rate == 0 {
        return Err(Error::Config(ConfigError::InvalidBaudRate(
            config.serial.baud_rate,
        )));
    }

    Ok(())
}

fn validate_motor(config: &super::MotorConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            config.steps_per_revolution,
        )));
    }

    if !is_positive(config.gear_ratio) {
        return Err(Error::Config(ConfigError::InvalidGearRatio(config.gear_ratio)));
    }

    // Both phases of the pulse must meet the driver's minimum width
    if config.pulse_high_us == 0 {
        return Err(Error::Config(ConfigError::InvalidPulseWidth(config.pulse_high_us)));
    }
    if config.pulse_low_us == 0 {
        return Err(Error::Config(ConfigError::InvalidPulseWidth(config.pulse_low_us)));
    }

    if !is_positive(config.max_speed.0) {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed(config.max_speed.0)));
    }

    if !is_positive(config.acceleration.0) {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration.0,
        )));
    }

    Ok(())
}

/// Finite and strictly greater than zero. NaN and infinities fail.
#[inline]
pub(crate) fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
