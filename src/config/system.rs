//! System configuration - root configuration structure.

use serde::Deserialize;

use super::homing::HomingConfig;
use super::motor::MotorConfig;
use super::report::{ReportConfig, SerialConfig};

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// The driven motor.
    pub motor: MotorConfig,

    /// Probe homing parameters.
    #[serde(default)]
    pub homing: HomingConfig,

    /// Angle status reporting.
    #[serde(default)]
    pub report: ReportConfig,

    /// Serial link parameters.
    #[serde(default)]
    pub serial: SerialConfig,
}

impl SystemConfig {
    /// Total steps per output revolution of the motor.
    #[inline]
    pub fn steps_per_revolution(&self) -> u32 {
        self.motor.total_steps_per_revolution()
    }
}
