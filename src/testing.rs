//! Fake hardware shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};

use crate::motor::{Idle, PulseTiming, StepperMotor};

#[derive(Debug, Clone, Copy)]
pub struct FakePinError;

impl embedded_hal::digital::Error for FakePinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Every level written to a pin, in order.
#[derive(Debug, Clone, Default)]
pub struct PinLog(Arc<Mutex<Vec<bool>>>);

impl PinLog {
    pub fn levels(&self) -> Vec<bool> {
        self.0.lock().unwrap().clone()
    }

    pub fn rising_edges(&self) -> usize {
        self.levels().iter().filter(|&&l| l).count()
    }
}

#[derive(Debug, Default)]
pub struct FakePin {
    log: PinLog,
    fail: bool,
}

impl FakePin {
    pub fn logged(log: PinLog) -> Self {
        Self { log, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            log: PinLog::default(),
            fail: true,
        }
    }

    fn write(&mut self, level: bool) -> Result<(), FakePinError> {
        if self.fail {
            return Err(FakePinError);
        }
        self.log.0.lock().unwrap().push(level);
        Ok(())
    }
}

impl ErrorType for FakePin {
    type Error = FakePinError;
}

impl OutputPin for FakePin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }
}

/// Total time requested from a delay provider.
#[derive(Debug, Clone, Default)]
pub struct DelayLog(Arc<AtomicU64>);

impl DelayLog {
    pub fn total_us(&self) -> u64 {
        self.0.load(Ordering::SeqCst) / 1000
    }
}

#[derive(Debug, Default)]
pub struct FakeDelay {
    log: DelayLog,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.0.fetch_add(u64::from(ns), Ordering::SeqCst);
    }
}

/// Input pin that plays back raw levels, then holds `rest`.
#[derive(Debug)]
pub struct ScriptedPin {
    levels: VecDeque<bool>,
    rest: bool,
    reads: usize,
}

impl ScriptedPin {
    pub fn new(levels: &[bool], rest: bool) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
            rest,
            reads: 0,
        }
    }

    fn next(&mut self) -> bool {
        self.reads += 1;
        self.levels.pop_front().unwrap_or(self.rest)
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl ErrorType for ScriptedPin {
    type Error = FakePinError;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.next())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.next())
    }
}

pub struct Logs {
    pub step: PinLog,
    pub dir: PinLog,
    pub delay: DelayLog,
}

pub type FakeMotor<STATE = Idle> = StepperMotor<FakePin, FakePin, FakeDelay, STATE>;

pub fn fake_motor() -> (FakeMotor, Logs) {
    let logs = Logs {
        step: PinLog::default(),
        dir: PinLog::default(),
        delay: DelayLog::default(),
    };
    let motor = StepperMotor::new(
        FakePin::logged(logs.step.clone()),
        FakePin::logged(logs.dir.clone()),
        FakeDelay {
            log: logs.delay.clone(),
        },
        6400,
        heapless::String::try_from("fake").unwrap(),
        false,
        PulseTiming::default(),
    );
    (motor, logs)
}
