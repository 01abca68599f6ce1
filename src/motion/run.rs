//! Continuous-run speed control.
//!
//! Ramps toward a commanded speed with a fixed acceleration and issues a
//! step whenever one is due. Meant to be polled from the main loop.

use libm::fabsf;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{StepsPerSec, StepsPerSecSquared};
use crate::config::MotorConfig;
use crate::error::Result;
use crate::motor::{Idle, StepperMotor};

use super::Direction;

/// Current phase of the speed ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunPhase {
    /// Speeding up toward the commanded speed.
    Accelerating,
    /// At the commanded speed.
    Cruising,
    /// Slowing toward the commanded speed (or toward zero for a reversal).
    Decelerating,
    /// Not moving and not commanded to.
    Stopped,
}

/// Acceleration-limited constant-speed stepping.
#[derive(Debug, Clone)]
pub struct RunController {
    /// Commanded speed (signed, steps/s).
    target_speed: f32,
    /// Speed right now (signed, steps/s).
    speed: f32,
    /// Magnitude limit for commanded speeds.
    max_speed: f32,
    /// Ramp rate in steps/s².
    acceleration: f32,
    /// Time of the last ramp update.
    last_update_us: Option<u64>,
    /// Time of the last issued step.
    last_step_us: Option<u64>,
}

impl RunController {
    /// Create a stopped controller.
    pub fn new(max_speed: StepsPerSec, acceleration: StepsPerSecSquared) -> Self {
        Self {
            target_speed: 0.0,
            speed: 0.0,
            max_speed: finite_magnitude(max_speed.0),
            acceleration: finite_magnitude(acceleration.0),
            last_update_us: None,
            last_step_us: None,
        }
    }

    /// Create a stopped controller with the motor's speed limits.
    pub fn from_config(config: &MotorConfig) -> Self {
        Self::new(config.max_speed, config.acceleration)
    }

    /// Command a new speed. The sign picks the direction; the magnitude is
    /// clamped to the maximum speed.
    pub fn set_speed(&mut self, speed: StepsPerSec) {
        self.target_speed = finite_or_zero(speed.0).clamp(-self.max_speed, self.max_speed);
    }

    /// Commanded speed.
    #[inline]
    pub fn target_speed(&self) -> StepsPerSec {
        StepsPerSec(self.target_speed)
    }

    /// Speed reached so far on the ramp.
    #[inline]
    pub fn speed(&self) -> StepsPerSec {
        StepsPerSec(self.speed)
    }

    /// Ramp down to a standstill.
    pub fn stop(&mut self) {
        self.target_speed = 0.0;
    }

    /// Stop immediately, dropping any ramp state.
    pub fn halt(&mut self) {
        self.target_speed = 0.0;
        self.speed = 0.0;
        self.last_update_us = None;
        self.last_step_us = None;
    }

    /// Whether the motor is moving or about to.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.speed != 0.0 || self.target_speed != 0.0
    }

    /// Current ramp phase.
    pub fn phase(&self) -> RunPhase {
        if self.speed == self.target_speed {
            if self.speed == 0.0 {
                RunPhase::Stopped
            } else {
                RunPhase::Cruising
            }
        } else if self.speed == 0.0
            || (self.speed * self.target_speed > 0.0 && fabsf(self.speed) < fabsf(self.target_speed))
        {
            RunPhase::Accelerating
        } else {
            RunPhase::Decelerating
        }
    }

    /// Interval between steps at the current speed, if moving.
    pub fn step_interval_us(&self) -> Option<u64> {
        let magnitude = fabsf(self.speed);
        if magnitude > 0.0 {
            Some((1_000_000.0 / magnitude) as u64)
        } else {
            None
        }
    }

    /// Advance the ramp to `now_us` and step once if a step is due.
    ///
    /// Non-blocking apart from the pulse itself. Returns `true` if a step was
    /// issued.
    pub fn run_speed<STEP, DIR, DELAY>(
        &mut self,
        motor: &mut StepperMotor<STEP, DIR, DELAY, Idle>,
        now_us: u64,
    ) -> Result<bool>
    where
        STEP: OutputPin,
        DIR: OutputPin,
        DELAY: DelayNs,
    {
        self.ramp(now_us);

        let Some(interval) = self.step_interval_us() else {
            return Ok(false);
        };

        let due = match self.last_step_us {
            Some(last) => now_us.saturating_sub(last) >= interval,
            None => true,
        };
        if !due {
            return Ok(false);
        }

        let direction = if self.speed > 0.0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        };
        motor.step(direction)?;
        self.last_step_us = Some(now_us);
        Ok(true)
    }

    fn ramp(&mut self, now_us: u64) {
        let Some(last) = self.last_update_us.replace(now_us) else {
            return;
        };

        let dt = now_us.saturating_sub(last) as f32 / 1_000_000.0;
        let max_delta = self.acceleration * dt;
        let diff = self.target_speed - self.speed;

        if fabsf(diff) <= max_delta {
            self.speed = self.target_speed;
        } else if diff > 0.0 {
            self.speed += max_delta;
        } else {
            self.speed -= max_delta;
        }

        if self.speed == 0.0 && self.target_speed == 0.0 {
            self.last_step_us = None;
        }
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// Limits that are not finite leave the controller unable to move
fn finite_magnitude(value: f32) -> f32 {
    fabsf(finite_or_zero(value))
}
