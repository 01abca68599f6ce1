//! # stepper-homing
//!
//! Probe-referenced homing and serial speed control for a step/dir stepper
//! motor, built on embedded-hal 1.0.
//!
//! ## Features
//!
//! - **Probe homing**: single-steps toward a marker, measures how long the
//!   probe stays asserted and backs off half of it to zero on the mark centre
//! - **Exclusive stepping authority**: the motor is moved into the homing
//!   worker for the session and handed back when it ends
//! - **Cancellable**: clearing the homing flag aborts without touching the zero
//! - **Speed control**: acceleration-limited continuous stepping
//! - **Serial commands**: `S<int>`, `T`, `X`, `L`
//! - **Angle reporting**: CSV status lines at a fixed cadence
//! - **no_std compatible**: everything but the threaded controller
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_homing::{Controller, ProbeSensor, StepperMotor};
//!
//! let config = stepper_homing::load_config("turntable.toml")?;
//!
//! let motor = StepperMotor::builder()
//!     .from_config(&config)?
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .delay(delay)
//!     .build()?;
//! let probe = ProbeSensor::new(probe_pin, config.homing.probe_active);
//!
//! let mut controller = Controller::new(&config, motor, probe);
//! controller.start(&mut out)?;
//! loop {
//!     while let Some(byte) = serial.read_byte() {
//!         controller.handle_byte(byte)?;
//!     }
//!     controller.poll(clock.now_us(), &mut out)?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): TOML loading and the threaded [`Controller`]
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod command;
pub mod config;
#[cfg(feature = "std")]
pub mod controller;
pub mod error;
pub mod homing;
pub mod motion;
pub mod motor;
pub mod probe;
pub mod report;

#[cfg(test)]
mod testing;

// Re-exports for ergonomic API
pub use command::{Command, CommandParser};
pub use config::{validate_config, HomingConfig, MotorConfig, ReportConfig, SystemConfig};
pub use error::{Error, HomingError, Result};
pub use homing::{backoff_steps, run_homing, HomingOutcome, HomingSession, HomingState};
pub use motion::{Direction, RunController, RunPhase};
pub use motor::{state, Position, StepperMotor};
pub use probe::{ActiveLevel, ProbeSensor};
pub use report::Reporter;

#[cfg(feature = "std")]
pub use controller::Controller;
#[cfg(feature = "std")]
pub use homing::{HomingFlag, HomingTask};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;

// Unit types
pub use config::units::{Degrees, Microsteps, Steps, StepsPerSec, StepsPerSecSquared};
