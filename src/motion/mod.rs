//! Motion module for stepper-homing.
//!
//! Provides step direction and the acceleration-limited continuous-run controller.

mod direction;
mod run;

pub use direction::Direction;
pub use run::{RunController, RunPhase};
