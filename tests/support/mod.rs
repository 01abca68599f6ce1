//! Fake hardware for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use embedded_hal_mock::eh1::delay::NoopDelay;

use stepper_homing::config::units::Microsteps;
use stepper_homing::{ActiveLevel, ProbeSensor, StepperMotor};

#[derive(Debug, Clone, Copy)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Levels written to an output pin.
#[derive(Debug, Clone, Default)]
pub struct PinLog(Arc<Mutex<Vec<bool>>>);

impl PinLog {
    pub fn levels(&self) -> Vec<bool> {
        self.0.lock().unwrap().clone()
    }

    pub fn pulses(&self) -> usize {
        self.levels().iter().filter(|&&level| level).count()
    }
}

/// Output pin that records every write and can clear a flag when it is
/// driven to a given level.
#[derive(Debug, Default)]
pub struct LogPin {
    log: PinLog,
    trip: Option<(bool, Arc<AtomicBool>)>,
}

impl LogPin {
    pub fn new(log: PinLog) -> Self {
        Self { log, trip: None }
    }

    pub fn clearing_on(mut self, level: bool, flag: Arc<AtomicBool>) -> Self {
        self.trip = Some((level, flag));
        self
    }

    fn write(&mut self, level: bool) -> Result<(), PinFault> {
        self.log.0.lock().unwrap().push(level);
        if let Some((trip_level, flag)) = &self.trip {
            if *trip_level == level {
                flag.store(false, Ordering::SeqCst);
            }
        }
        Ok(())
    }
}

impl ErrorType for LogPin {
    type Error = PinFault;
}

impl OutputPin for LogPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }
}

/// Active-high probe input that plays back presence samples.
///
/// Once the script runs out it reads "absent", and clears `on_exhausted`
/// if one is set so an open-ended scan gets cancelled.
#[derive(Debug)]
pub struct ProbeScript {
    samples: VecDeque<bool>,
    rest: bool,
    on_exhausted: Option<Arc<AtomicBool>>,
    reads: Arc<Mutex<usize>>,
}

impl ProbeScript {
    pub fn new(samples: &[bool]) -> Self {
        Self {
            samples: samples.iter().copied().collect(),
            rest: false,
            on_exhausted: None,
            reads: Arc::default(),
        }
    }

    pub fn then_hold(mut self, present: bool) -> Self {
        self.rest = present;
        self
    }

    pub fn cancel_when_done(mut self, flag: Arc<AtomicBool>) -> Self {
        self.on_exhausted = Some(flag);
        self
    }

    pub fn read_counter(&self) -> Arc<Mutex<usize>> {
        self.reads.clone()
    }

    fn next(&mut self) -> bool {
        *self.reads.lock().unwrap() += 1;
        match self.samples.pop_front() {
            Some(present) => present,
            None => {
                if let Some(flag) = &self.on_exhausted {
                    flag.store(false, Ordering::SeqCst);
                }
                self.rest
            }
        }
    }

    pub fn sensor(self) -> ProbeSensor<Self> {
        ProbeSensor::new(self, ActiveLevel::High)
    }
}

impl ErrorType for ProbeScript {
    type Error = PinFault;
}

impl InputPin for ProbeScript {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.next())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.next())
    }
}

pub struct Rig {
    pub step: PinLog,
    pub dir: PinLog,
}

pub type TestMotor = StepperMotor<LogPin, LogPin, NoopDelay>;

/// 6400 steps/rev motor on logging pins with a short pulse.
pub fn motor() -> (TestMotor, Rig) {
    motor_with_dir(LogPin::new)
}

pub fn motor_with_dir<F>(dir: F) -> (TestMotor, Rig)
where
    F: FnOnce(PinLog) -> LogPin,
{
    let rig = Rig {
        step: PinLog::default(),
        dir: PinLog::default(),
    };
    let motor = StepperMotor::builder()
        .name("test")
        .step_pin(LogPin::new(rig.step.clone()))
        .dir_pin(dir(rig.dir.clone()))
        .delay(NoopDelay::new())
        .steps_per_revolution(200)
        .microsteps(Microsteps::THIRTY_SECOND)
        .pulse_us(2, 2)
        .build()
        .unwrap();
    (motor, rig)
}
