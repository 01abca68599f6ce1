//! Homing session state machine.
//!
//! Pure edge detection and dwell counting over probe samples. Hardware
//! access lives in [`run_homing`](super::run_homing); everything here can be
//! driven sample by sample.

/// Phase of a homing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingState {
    /// No session running.
    #[default]
    Idle,
    /// Stepping toward the probe, mark not seen yet.
    Scanning,
    /// Probe asserted, counting dwell steps.
    OnMark,
    /// Mark left behind, retracing half the dwell.
    BackingOff,
    /// Zero set; the session is over.
    Done,
}

impl HomingState {
    /// Whether the session still owns the motor.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(
            self,
            HomingState::Scanning | HomingState::OnMark | HomingState::BackingOff
        )
    }
}

/// What one probe sample meant to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MarkEvent {
    /// Probe not asserted and was not before.
    Searching,
    /// False→true: dwell counter restarted.
    Entered,
    /// Still on the mark after `steps` counted steps.
    Dwelling {
        /// Steps counted since the latest entry.
        steps: u32,
    },
    /// True→false: time to back off.
    Exited {
        /// Steps counted since the latest entry.
        dwell: u32,
        /// Steps to retrace away from the probe.
        backoff: u32,
    },
}

/// Steps to retrace after leaving the mark: half the dwell, at least one.
#[inline]
pub const fn backoff_steps(dwell: u32) -> u32 {
    let half = dwell / 2;
    if half == 0 {
        1
    } else {
        half
    }
}

/// State of one homing session.
#[derive(Debug, Clone, Default)]
pub struct HomingSession {
    state: HomingState,
    was_on_mark: bool,
    steps_since_mark_entry: u32,
    backoff_remaining: u32,
}

impl HomingSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start scanning. Returns `false`, leaving everything untouched, if a
    /// session is already running.
    pub fn begin(&mut self) -> bool {
        if self.state.is_active() {
            return false;
        }
        *self = Self {
            state: HomingState::Scanning,
            ..Self::default()
        };
        true
    }

    /// Current phase.
    #[inline]
    pub fn state(&self) -> HomingState {
        self.state
    }

    /// Probe state seen on the previous sample.
    #[inline]
    pub fn was_on_mark(&self) -> bool {
        self.was_on_mark
    }

    /// Steps counted since the latest false→true transition.
    #[inline]
    pub fn steps_since_mark_entry(&self) -> u32 {
        self.steps_since_mark_entry
    }

    /// Backoff steps still to take.
    #[inline]
    pub fn backoff_remaining(&self) -> u32 {
        self.backoff_remaining
    }

    /// Feed the probe sample taken after a step toward the probe.
    ///
    /// Samples outside `Scanning`/`OnMark` are ignored and reported as
    /// [`MarkEvent::Searching`].
    pub fn observe(&mut self, on_mark: bool) -> MarkEvent {
        if !matches!(self.state, HomingState::Scanning | HomingState::OnMark) {
            return MarkEvent::Searching;
        }

        let event = match (self.was_on_mark, on_mark) {
            (false, true) => {
                // Only the latest entry counts; earlier windows are dropped
                self.steps_since_mark_entry = 0;
                self.state = HomingState::OnMark;
                MarkEvent::Entered
            }
            (true, false) => {
                let dwell = self.steps_since_mark_entry;
                let backoff = backoff_steps(dwell);
                self.backoff_remaining = backoff;
                self.state = HomingState::BackingOff;
                MarkEvent::Exited { dwell, backoff }
            }
            (true, true) => {
                self.steps_since_mark_entry = self.steps_since_mark_entry.saturating_add(1);
                MarkEvent::Dwelling {
                    steps: self.steps_since_mark_entry,
                }
            }
            (false, false) => MarkEvent::Searching,
        };

        self.was_on_mark = on_mark;
        event
    }

    /// Record one backoff step. Returns the steps still to take.
    pub fn record_backoff_step(&mut self) -> u32 {
        if self.state == HomingState::BackingOff {
            self.backoff_remaining = self.backoff_remaining.saturating_sub(1);
        }
        self.backoff_remaining
    }

    /// Backoff finished and the zero was set.
    pub fn complete(&mut self) {
        if self.state == HomingState::BackingOff && self.backoff_remaining == 0 {
            self.state = HomingState::Done;
        }
    }

    /// Tear the session down without completing it.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}
