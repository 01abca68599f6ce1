//! Blocking homing routine.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::HomingConfig;
use crate::error::Result;
use crate::motor::{Homing, StepperMotor};
use crate::probe::ProbeSensor;

use super::machine::{HomingSession, MarkEvent};

/// How a homing session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingOutcome {
    /// Mark found and centred; the position is now zero.
    Completed {
        /// Steps the probe stayed asserted after the latest entry.
        dwell_steps: u32,
        /// Steps retraced away from the probe.
        backoff_steps: u32,
    },
    /// The flag was cleared from outside; no zero was set.
    Cancelled,
}

/// Home the motor against the probe.
///
/// `active` must already be set; clearing it from elsewhere cancels the
/// session within one step. The flag is cleared on every exit path. There is
/// no timeout: a probe that never asserts keeps the scan going until it is
/// cancelled.
///
/// # Errors
///
/// Returns an error if a STEP/DIR pin write or a probe read fails.
pub fn run_homing<STEP, DIR, DELAY, PIN>(
    motor: &mut StepperMotor<STEP, DIR, DELAY, Homing>,
    probe: &mut ProbeSensor<PIN>,
    config: &HomingConfig,
    active: &AtomicBool,
) -> Result<HomingOutcome>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    PIN: InputPin,
{
    let mut session = HomingSession::new();
    session.begin();

    #[cfg(feature = "defmt")]
    defmt::info!("homing: scanning {}", config.toward_probe);

    let outcome = scan(motor, probe, config, active, &mut session);
    active.store(false, Ordering::Release);
    outcome
}

fn scan<STEP, DIR, DELAY, PIN>(
    motor: &mut StepperMotor<STEP, DIR, DELAY, Homing>,
    probe: &mut ProbeSensor<PIN>,
    config: &HomingConfig,
    active: &AtomicBool,
    session: &mut HomingSession,
) -> Result<HomingOutcome>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    PIN: InputPin,
{
    loop {
        if !active.load(Ordering::Acquire) {
            session.cancel();
            #[cfg(feature = "defmt")]
            defmt::info!("homing: cancelled while scanning");
            return Ok(HomingOutcome::Cancelled);
        }

        motor.step(config.toward_probe)?;
        let on_mark = probe.is_present()?;

        match session.observe(on_mark) {
            MarkEvent::Exited { dwell, backoff } => {
                #[cfg(feature = "defmt")]
                defmt::debug!("homing: left mark after {} steps, backing off {}", dwell, backoff);
                return back_off(motor, config, active, session, dwell, backoff);
            }
            #[cfg(feature = "defmt")]
            MarkEvent::Entered => defmt::debug!("homing: entered mark"),
            _ => {}
        }

        motor.pause_us(config.yield_us);
    }
}

fn back_off<STEP, DIR, DELAY>(
    motor: &mut StepperMotor<STEP, DIR, DELAY, Homing>,
    config: &HomingConfig,
    active: &AtomicBool,
    session: &mut HomingSession,
    dwell: u32,
    backoff: u32,
) -> Result<HomingOutcome>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    let away = config.away_from_probe();

    while session.backoff_remaining() > 0 {
        if !active.load(Ordering::Acquire) {
            session.cancel();
            #[cfg(feature = "defmt")]
            defmt::info!("homing: cancelled while backing off");
            return Ok(HomingOutcome::Cancelled);
        }

        motor.step(away)?;
        session.record_backoff_step();
        motor.pause_us(config.yield_us);
    }

    motor.set_origin();
    session.complete();

    #[cfg(feature = "defmt")]
    defmt::info!("homing: zero set");

    Ok(HomingOutcome::Completed {
        dwell_steps: dwell,
        backoff_steps: backoff,
    })
}
