//! Unit types for positions and rates.
//!
//! The motor only ever counts [`Steps`]; degrees exist for reporting and
//! rates for the run controller.

use serde::Deserialize;

use crate::error::ConfigError;

/// Angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Degrees(pub f32);

impl Degrees {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Signed step count from the last zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Steps(pub i64);

impl Steps {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Angle within one output revolution, in `[0, 360)`.
    ///
    /// Negative counts wrap upward, so `-1` lands just below 360°.
    pub fn to_angle(self, steps_per_revolution: u32) -> Degrees {
        if steps_per_revolution == 0 {
            return Degrees(0.0);
        }
        let revolution = i64::from(steps_per_revolution);
        Degrees(self.0.rem_euclid(revolution) as f32 * 360.0 / revolution as f32)
    }
}

/// Step rate. The sign selects the direction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct StepsPerSec(pub f32);

impl StepsPerSec {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Rate for a shaft speed in revolutions per minute.
    #[inline]
    pub fn from_rpm(rpm: f32, steps_per_revolution: u32) -> Self {
        Self(rpm / 60.0 * steps_per_revolution as f32)
    }
}

/// Rate change in steps per second squared.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct StepsPerSecSquared(pub f32);

impl StepsPerSecSquared {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Driver microstep divisor: a power of two up to 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u16")]
pub struct Microsteps(u16);

impl Microsteps {
    /// Full steps.
    pub const FULL: Self = Self(1);
    /// 1/16 steps.
    pub const SIXTEENTH: Self = Self(16);
    /// 1/32 steps.
    pub const THIRTY_SECOND: Self = Self(32);

    const MAX: u16 = 256;

    /// Validate a divisor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMicrosteps` unless `value` is a power of
    /// two no larger than 256.
    pub fn new(value: u16) -> Result<Self, ConfigError> {
        if value.is_power_of_two() && value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidMicrosteps(value))
        }
    }

    /// Get the divisor.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl Default for Microsteps {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<u16> for Microsteps {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
