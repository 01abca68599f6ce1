//! Probe homing for stepper-homing.
//!
//! Steps toward the probe one pulse at a time, tracks how long the probe
//! stays asserted, backs off half of that once it deasserts and sets the
//! zero there.

#[cfg(feature = "std")]
mod flag;
mod machine;
mod routine;
#[cfg(feature = "std")]
mod worker;

#[cfg(feature = "std")]
pub use flag::HomingFlag;
pub use machine::{backoff_steps, HomingSession, HomingState, MarkEvent};
pub use routine::{run_homing, HomingOutcome};
#[cfg(feature = "std")]
pub use worker::{HomingReport, HomingTask};
