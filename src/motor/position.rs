//! Position tracking for stepper motors.
//!
//! Provides signed step counting with angle conversion.

use crate::config::units::{Degrees, Steps};
use crate::motion::Direction;

/// Motor position tracker.
///
/// Counts every step pulse and converts to an angle within one output
/// revolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    /// Current position in steps (from the last zero)
    steps: Steps,
    /// Steps per output revolution for angle conversion
    steps_per_revolution: u32,
}

impl Position {
    /// Create a new position tracker at zero.
    #[inline]
    pub fn new(steps_per_revolution: u32) -> Self {
        Self {
            steps: Steps::default(),
            steps_per_revolution,
        }
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Get the angle within one revolution, in `[0, 360)`.
    #[inline]
    pub fn angle(&self) -> Degrees {
        self.steps.to_angle(self.steps_per_revolution)
    }

    /// Set position in steps.
    #[inline]
    pub fn set_steps(&mut self, steps: Steps) {
        self.steps = steps;
    }

    /// Record one step in `direction`.
    #[inline]
    pub fn advance(&mut self, direction: Direction) {
        self.steps = Steps(self.steps.0 + direction.sign());
    }

    /// Set current position as the new origin.
    #[inline]
    pub fn set_origin(&mut self) {
        self.steps = Steps::default();
    }

    /// Get steps per output revolution.
    #[inline]
    pub fn steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tracking() {
        // 200 steps/rev * 32 microsteps = 6400 steps/rev
        let mut pos = Position::new(6400);

        assert_eq!(pos.steps().value(), 0);

        for _ in 0..1600 {
            pos.advance(Direction::Clockwise);
        }
        assert_eq!(pos.steps(), Steps(1600));
        assert!((pos.angle().value() - 90.0).abs() < 0.001);

        for _ in 0..3200 {
            pos.advance(Direction::CounterClockwise);
        }
        assert_eq!(pos.steps(), Steps(-1600));
        assert!((pos.angle().value() - 270.0).abs() < 0.001);
    }

    #[test]
    fn test_set_origin() {
        let mut pos = Position::new(6400);
        pos.set_steps(Steps(-42));
        pos.set_origin();
        assert_eq!(pos.steps(), Steps(0));
        assert_eq!(pos.angle(), Degrees(0.0));
    }
}
