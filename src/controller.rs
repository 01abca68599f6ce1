//! Command dispatch and the cooperative main loop.
//!
//! [`Controller`] owns the motor while the run controller has stepping
//! authority and loans it to a [`HomingTask`] for the length of a homing
//! session. While the loan is out, every serial command is ignored and the
//! run controller is not polled.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::command::{Command, CommandParser};
use crate::config::units::{Degrees, Steps, StepsPerSec};
use crate::config::{HomingConfig, SystemConfig};
use crate::error::{MotorError, Result};
use crate::homing::{HomingFlag, HomingOutcome, HomingTask};
use crate::motion::RunController;
use crate::motor::{Idle, StepperMotor};
use crate::probe::ProbeSensor;
use crate::report::{Reporter, HOMED};

/// Serial-driven motor controller with threaded homing.
pub struct Controller<STEP, DIR, DELAY, PIN>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    PIN: InputPin,
{
    /// Present while the run controller holds stepping authority.
    motor: Option<StepperMotor<STEP, DIR, DELAY, Idle>>,
    probe: Option<ProbeSensor<PIN>>,
    run: RunController,
    parser: CommandParser,
    reporter: Reporter,
    homing: HomingConfig,
    flag: HomingFlag,
    task: Option<HomingTask<STEP, DIR, DELAY, PIN>>,
    last_outcome: Option<HomingOutcome>,
}

impl<STEP, DIR, DELAY, PIN> Controller<STEP, DIR, DELAY, PIN>
where
    STEP: OutputPin + Send + 'static,
    DIR: OutputPin + Send + 'static,
    DELAY: DelayNs + Send + 'static,
    PIN: InputPin + Send + 'static,
{
    /// Create a stopped controller.
    pub fn new(
        config: &SystemConfig,
        motor: StepperMotor<STEP, DIR, DELAY, Idle>,
        probe: ProbeSensor<PIN>,
    ) -> Self {
        Self {
            motor: Some(motor),
            probe: Some(probe),
            run: RunController::from_config(&config.motor),
            parser: CommandParser::new(),
            reporter: Reporter::from_config(&config.report),
            homing: config.homing,
            flag: HomingFlag::new(),
            task: None,
            last_outcome: None,
        }
    }

    /// Write the startup banner and CSV header.
    pub fn start<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.reporter.write_startup(out)?;
        Ok(())
    }

    /// Feed one byte from the serial link and dispatch what it completes.
    pub fn handle_byte(&mut self, byte: u8) -> Result<()> {
        for command in self.parser.push(byte) {
            self.handle_command(command)?;
        }
        Ok(())
    }

    /// Feed a buffer from the serial link.
    pub fn handle_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        bytes.iter().try_for_each(|&byte| self.handle_byte(byte))
    }

    /// Apply one command. Returns `false` if it was ignored.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::NotAvailable` if `L` arrives after a failed
    /// session lost the motor.
    pub fn handle_command(&mut self, command: Command) -> Result<bool> {
        if self.is_homing() {
            #[cfg(feature = "defmt")]
            defmt::debug!("ignoring {} while homing", command);
            return Ok(false);
        }

        match command {
            Command::SetSpeed(speed) => self.run.set_speed(StepsPerSec(speed as f32)),
            Command::Stop => self.run.stop(),
            Command::ToggleDirection => match self.motor.as_mut() {
                Some(motor) => {
                    let _inverted = motor.toggle_invert_direction();
                    #[cfg(feature = "defmt")]
                    defmt::info!("direction inverted: {}", _inverted);
                }
                None => return Err(MotorError::NotAvailable.into()),
            },
            Command::Home => return self.start_homing(),
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("command {}", command);
        Ok(true)
    }

    fn start_homing(&mut self) -> Result<bool> {
        if !self.flag.try_activate() {
            return Ok(false);
        }

        let (motor, probe) = match (self.motor.take(), self.probe.take()) {
            (Some(motor), Some(probe)) => (motor, probe),
            (motor, probe) => {
                self.motor = motor;
                self.probe = probe;
                self.flag.cancel();
                return Err(MotorError::NotAvailable.into());
            }
        };

        // Ramp timestamps go stale while the worker owns the motor
        self.run.halt();
        self.last_outcome = None;

        #[cfg(feature = "defmt")]
        defmt::info!("homing started");

        self.task = Some(HomingTask::spawn(
            motor,
            probe,
            self.homing,
            self.flag.clone(),
        ));
        Ok(true)
    }

    /// One pass of the main loop.
    ///
    /// Reclaims a finished homing worker (writing `HOMED` if it set the
    /// zero), then, unless homing is still running, lets the run controller
    /// step. While the motor runs, a status line is written when one is due.
    pub fn poll<W: Write>(&mut self, now_us: u64, out: &mut W) -> Result<()> {
        if self.task.as_ref().is_some_and(|task| task.is_finished()) {
            self.join_homing(out)?;
        }
        if self.is_homing() {
            return Ok(());
        }

        let Some(motor) = self.motor.as_mut() else {
            return Ok(());
        };
        self.run.run_speed(motor, now_us)?;
        if self.run.is_running() {
            self.reporter.report(out, now_us / 1000, motor.angle())?;
        }
        Ok(())
    }

    /// Block until the homing worker returns and take the motor back.
    ///
    /// Returns `None` if no session was running.
    ///
    /// # Errors
    ///
    /// Returns the session's hardware error, or
    /// `HomingError::WorkerPanicked` if the worker died with the motor.
    pub fn join_homing<W: Write>(&mut self, out: &mut W) -> Result<Option<HomingOutcome>> {
        let Some(task) = self.task.take() else {
            return Ok(None);
        };

        let report = task.join()?;
        self.motor = Some(report.motor);
        self.probe = Some(report.probe);
        let outcome = report.outcome?;

        if let HomingOutcome::Completed { .. } = outcome {
            writeln!(out, "{}", HOMED)?;
        }
        self.reporter.reset();
        self.last_outcome = Some(outcome);

        #[cfg(feature = "defmt")]
        defmt::info!("homing finished: {}", outcome);

        Ok(Some(outcome))
    }

    /// Ask a running homing session to stop. It ends without setting a zero.
    pub fn cancel_homing(&self) {
        self.flag.cancel();
    }

    /// Whether a homing session holds the motor.
    #[inline]
    pub fn is_homing(&self) -> bool {
        self.flag.is_active() || self.task.is_some()
    }

    /// Outcome of the last reclaimed homing session.
    #[inline]
    pub fn last_outcome(&self) -> Option<HomingOutcome> {
        self.last_outcome
    }

    /// The motor, unless it is loaned to a homing session.
    #[inline]
    pub fn motor(&self) -> Option<&StepperMotor<STEP, DIR, DELAY, Idle>> {
        self.motor.as_ref()
    }

    /// Current position, unless homing owns the motor.
    pub fn position_steps(&self) -> Option<Steps> {
        self.motor.as_ref().map(|motor| motor.position_steps())
    }

    /// Current angle, unless homing owns the motor.
    pub fn angle(&self) -> Option<Degrees> {
        self.motor.as_ref().map(|motor| motor.angle())
    }

    /// The run controller.
    #[inline]
    pub fn run_controller(&self) -> &RunController {
        &self.run
    }
}
