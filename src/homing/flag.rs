//! Cross-thread homing flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "homing is active" flag.
///
/// Single writer per phase: the command side sets it when a session starts
/// (or clears it to cancel), the homing worker clears it when it finishes.
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct HomingFlag(Arc<AtomicBool>);

impl HomingFlag {
    /// Create a cleared flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag if it is clear. Returns `false` if a session is already
    /// active.
    pub fn try_activate(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Ask the running session to stop.
    pub fn cancel(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Whether a session is active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// The underlying atomic, for [`run_homing`](super::run_homing).
    #[inline]
    pub fn as_atomic(&self) -> &AtomicBool {
        &self.0
    }
}
