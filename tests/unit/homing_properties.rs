//! Property tests for the homing state machine and routine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use proptest::prelude::*;

use stepper_homing::config::units::Steps;
use stepper_homing::{
    backoff_steps, run_homing, HomingConfig, HomingOutcome, HomingSession, HomingState,
};

use crate::support::{self, ProbeScript};

/// Dwell and backoff of the first exit from the mark, if there is one.
fn first_exit(samples: &[bool]) -> Option<(u32, u32)> {
    let mut run = 0u32;
    for &present in samples {
        if present {
            run += 1;
        } else if run > 0 {
            let dwell = run - 1;
            return Some((dwell, backoff_steps(dwell)));
        }
    }
    None
}

#[test]
fn test_backoff_table() {
    for (dwell, backoff) in [(0, 1), (1, 1), (2, 1), (3, 1), (10, 5)] {
        assert_eq!(backoff_steps(dwell), backoff);
    }
}

#[test]
fn test_second_begin_leaves_session_alone() {
    let mut session = HomingSession::new();
    assert!(session.begin());
    session.observe(true);
    session.observe(true);

    assert!(!session.begin());
    assert_eq!(session.state(), HomingState::OnMark);
    assert!(session.was_on_mark());
    assert_eq!(session.steps_since_mark_entry(), 1);
}

proptest! {
    #[test]
    fn prop_backoff_is_half_dwell_at_least_one(dwell in 0u32..100_000) {
        let backoff = backoff_steps(dwell);
        prop_assert!(backoff >= 1);
        prop_assert_eq!(backoff, (dwell / 2).max(1));
    }

    #[test]
    fn prop_zero_set_iff_mark_entered_and_left(
        samples in prop::collection::vec(any::<bool>(), 0..48)
    ) {
        let active = Arc::new(AtomicBool::new(true));
        let (motor, rig) = support::motor();
        let mut motor = motor.into_homing();
        let mut probe = ProbeScript::new(&samples)
            .cancel_when_done(active.clone())
            .sensor();

        let outcome = run_homing(&mut motor, &mut probe, &HomingConfig::default(), &active)
            .unwrap();

        match first_exit(&samples) {
            Some((dwell, backoff)) => {
                prop_assert_eq!(
                    outcome,
                    HomingOutcome::Completed { dwell_steps: dwell, backoff_steps: backoff }
                );
                prop_assert_eq!(motor.position_steps(), Steps(0));
            }
            None => {
                prop_assert_eq!(outcome, HomingOutcome::Cancelled);
                // Every scan step stays counted
                prop_assert_eq!(motor.position_steps(), Steps(samples.len() as i64 + 1));
                prop_assert_eq!(rig.step.pulses(), samples.len() + 1);
            }
        }
        prop_assert!(!active.load(Ordering::SeqCst));
    }
}
