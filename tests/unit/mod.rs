//! Unit test harness for stepper-homing.
//!
//! Component-level tests that only use the public API.

mod config_parsing;
mod homing_properties;
