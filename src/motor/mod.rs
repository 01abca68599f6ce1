//! Motor module for stepper-homing.
//!
//! Provides the step/dir driver with type-state stepping authority and
//! position tracking.

mod builder;
mod driver;
mod position;
pub mod state;

pub use builder::StepperMotorBuilder;
pub use driver::{PulseTiming, StepperMotor};
pub use position::Position;
pub use state::{Homing, Idle, MotorState};
