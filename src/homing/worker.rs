//! Homing on its own thread.
//!
//! The motor and probe are moved into the worker for the whole session, so
//! nothing else can step the motor until the task is joined and hands them
//! back.

use std::thread::{self, JoinHandle};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::HomingConfig;
use crate::error::{HomingError, Result};
use crate::motor::{Idle, StepperMotor};
use crate::probe::ProbeSensor;

use super::flag::HomingFlag;
use super::routine::{run_homing, HomingOutcome};

/// Everything a finished homing worker hands back.
pub struct HomingReport<STEP, DIR, DELAY, PIN>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    PIN: InputPin,
{
    /// The motor, back under run-controller authority.
    pub motor: StepperMotor<STEP, DIR, DELAY, Idle>,
    /// The probe sensor.
    pub probe: ProbeSensor<PIN>,
    /// How the session ended.
    pub outcome: Result<HomingOutcome>,
}

/// A homing session running on a worker thread.
pub struct HomingTask<STEP, DIR, DELAY, PIN>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    PIN: InputPin,
{
    handle: JoinHandle<HomingReport<STEP, DIR, DELAY, PIN>>,
    flag: HomingFlag,
}

impl<STEP, DIR, DELAY, PIN> HomingTask<STEP, DIR, DELAY, PIN>
where
    STEP: OutputPin + Send + 'static,
    DIR: OutputPin + Send + 'static,
    DELAY: DelayNs + Send + 'static,
    PIN: InputPin + Send + 'static,
{
    /// Move the motor and probe to a new thread and start homing.
    ///
    /// The caller sets `flag` (see [`HomingFlag::try_activate`]) before
    /// spawning; a cleared flag makes the worker return at once.
    pub fn spawn(
        motor: StepperMotor<STEP, DIR, DELAY, Idle>,
        probe: ProbeSensor<PIN>,
        config: HomingConfig,
        flag: HomingFlag,
    ) -> Self {
        let worker_flag = flag.clone();
        let handle = thread::spawn(move || {
            let mut motor = motor.into_homing();
            let mut probe = probe;
            let outcome = run_homing(&mut motor, &mut probe, &config, worker_flag.as_atomic());
            HomingReport {
                motor: motor.finish(),
                probe,
                outcome,
            }
        });

        Self { handle, flag }
    }

    /// Whether the worker has returned.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Ask the worker to stop.
    pub fn cancel(&self) {
        self.flag.cancel();
    }

    /// Wait for the worker and take the motor back.
    ///
    /// # Errors
    ///
    /// Returns `HomingError::WorkerPanicked` if the worker thread panicked.
    pub fn join(self) -> Result<HomingReport<STEP, DIR, DELAY, PIN>> {
        self.handle.join().map_err(|_| {
            // The worker never got to clear it
            self.flag.cancel();
            HomingError::WorkerPanicked.into()
        })
    }
}
