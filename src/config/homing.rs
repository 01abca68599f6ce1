//! Homing configuration from TOML.

use serde::Deserialize;

use crate::motion::Direction;
use crate::probe::ActiveLevel;

/// Default pause between homing steps, in microseconds.
pub const DEFAULT_YIELD_US: u32 = 1000;

/// Homing behaviour: which way the probe lies and how its input reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HomingConfig {
    /// Direction that moves the carriage toward the probe mark.
    #[serde(default = "default_toward_probe")]
    pub toward_probe: Direction,

    /// Input level that means the mark is under the probe.
    #[serde(default)]
    pub probe_active: ActiveLevel,

    /// Pause after every homing step so other work can run.
    #[serde(default = "default_yield_us")]
    pub yield_us: u32,
}

fn default_toward_probe() -> Direction {
    Direction::Clockwise
}

fn default_yield_us() -> u32 {
    DEFAULT_YIELD_US
}

impl HomingConfig {
    /// Direction that retraces steps away from the probe.
    #[inline]
    pub fn away_from_probe(&self) -> Direction {
        self.toward_probe.reverse()
    }
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            toward_probe: default_toward_probe(),
            probe_active: ActiveLevel::default(),
            yield_us: DEFAULT_YIELD_US,
        }
    }
}
