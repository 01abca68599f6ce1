//! Configuration module for stepper-homing.
//!
//! Provides types for loading and validating motor, homing and reporting
//! configuration from TOML files (with `std` feature) or pre-parsed data.

mod homing;
#[cfg(feature = "std")]
mod loader;
mod motor;
mod report;
mod system;
pub mod units;
mod validation;

pub use homing::{HomingConfig, DEFAULT_YIELD_US};
pub use motor::{MotorConfig, DEFAULT_PULSE_US};
pub use report::{ReportConfig, SerialConfig, DEFAULT_BAUD_RATE, DEFAULT_REPORT_INTERVAL_MS};
pub use system::SystemConfig;
pub use validation::validate_config;
pub(crate) use validation::is_positive;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, Microsteps, Steps, StepsPerSec, StepsPerSecSquared};
