//! Motor configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::units::{Microsteps, StepsPerSec, StepsPerSecSquared};

/// Default step pulse high and low time in microseconds.
pub const DEFAULT_PULSE_US: u32 = 2000;

/// Motor configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorConfig {
    /// Human-readable name (max 32 chars).
    #[serde(default = "default_name")]
    pub name: String<32>,

    /// Base steps per revolution (typically 200 for 1.8° motors).
    pub steps_per_revolution: u16,

    /// Microstep setting (1, 2, 4, 8, 16, 32, etc.).
    #[serde(default)]
    pub microsteps: Microsteps,

    /// Gear ratio (output:input, e.g., 5.0 means 5:1 reduction).
    #[serde(default = "default_gear_ratio")]
    pub gear_ratio: f32,

    /// Invert direction pin logic at startup.
    #[serde(default)]
    pub invert_direction: bool,

    /// STEP pin high time per pulse, in microseconds.
    #[serde(default = "default_pulse_us")]
    pub pulse_high_us: u32,

    /// STEP pin low time per pulse, in microseconds.
    #[serde(default = "default_pulse_us")]
    pub pulse_low_us: u32,

    /// Maximum continuous speed magnitude.
    #[serde(rename = "max_speed_steps_per_sec")]
    pub max_speed: StepsPerSec,

    /// Acceleration used to ramp between commanded speeds.
    #[serde(rename = "acceleration_steps_per_sec2")]
    pub acceleration: StepsPerSecSquared,
}

fn default_name() -> String<32> {
    String::try_from("motor").unwrap_or_default()
}

fn default_gear_ratio() -> f32 {
    1.0
}

fn default_pulse_us() -> u32 {
    DEFAULT_PULSE_US
}

impl MotorConfig {
    /// Calculate total steps per output shaft revolution.
    pub fn total_steps_per_revolution(&self) -> u32 {
        (self.steps_per_revolution as f32 * self.microsteps.value() as f32 * self.gear_ratio)
            as u32
    }
}
