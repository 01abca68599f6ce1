//! Stepping authority markers.
//!
//! A motor in [`Idle`] belongs to the run controller. [`Homing`] means a
//! homing session holds it; the only way back is
//! [`StepperMotor::finish`](super::StepperMotor::finish).

/// Run controller holds stepping authority.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

/// A homing session holds stepping authority.
#[derive(Debug, Clone, Copy)]
pub struct Homing;

/// Who may pulse the motor. Sealed.
pub trait MotorState: sealed::Sealed {
    /// Name used in logs.
    const NAME: &'static str;
}

impl MotorState for Idle {
    const NAME: &'static str = "Idle";
}

impl MotorState for Homing {
    const NAME: &'static str = "Homing";
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Idle {}
    impl Sealed for super::Homing {}
}
