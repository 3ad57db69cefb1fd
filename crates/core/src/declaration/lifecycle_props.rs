//! Property-based tests for the lock guard and declaration transitions.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use super::guard::{LockGuard, LockState};
use super::lifecycle::{DeclarationLifecycle, Transition};
use super::types::{DeclarationStatus, ReportingPeriod};
use super::error::DeclarationError;

fn arb_status() -> impl Strategy<Value = DeclarationStatus> {
    prop_oneof![
        Just(DeclarationStatus::Draft),
        Just(DeclarationStatus::Submitted),
    ]
}

fn arb_stored_status() -> impl Strategy<Value = Option<DeclarationStatus>> {
    prop_oneof![Just(None), arb_status().prop_map(Some)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The guard matches its closed-form rule for every input.
    #[test]
    fn prop_guard_matches_rule(
        status in arb_status(),
        offset in -86_400i64..86_400,
        ack in any::<bool>(),
    ) {
        let deadline = Utc.with_ymd_and_hms(2026, 4, 1, 2, 59, 59).unwrap();
        let now = deadline + Duration::seconds(offset);
        let state = LockGuard::evaluate(status, now, deadline, ack);

        let locked = now > deadline || (status == DeclarationStatus::Submitted && !ack);
        prop_assert_eq!(state.is_locked(), locked);
        prop_assert_eq!(state == LockState::Closed, now > deadline);
    }

    /// After the deadline, nothing lifts the lock.
    #[test]
    fn prop_closed_period_has_no_transition(
        status in arb_stored_status(),
        seconds_late in 1i64..10_000_000,
    ) {
        let deadline = Utc.with_ymd_and_hms(2026, 4, 1, 2, 59, 59).unwrap();
        let period = ReportingPeriod::new(2025, deadline);
        let now = deadline + Duration::seconds(seconds_late);

        let submitted = matches!(
            DeclarationLifecycle::submit(status, &period, now),
            Err(DeclarationError::DeadlinePassed { .. })
        );
        let rectified = matches!(
            DeclarationLifecycle::rectify(status, &period, now),
            Err(DeclarationError::DeadlinePassed { .. })
        );
        prop_assert!(submitted);
        prop_assert!(rectified);
        prop_assert_eq!(
            LockGuard::evaluate(status.unwrap_or_default(), now, deadline, true),
            LockState::Closed
        );
    }

    /// Every transition the lifecycle produces is a valid one.
    #[test]
    fn prop_transitions_are_valid(
        status in arb_stored_status(),
        seconds_early in 0i64..10_000_000,
    ) {
        let deadline = Utc.with_ymd_and_hms(2026, 4, 1, 2, 59, 59).unwrap();
        let period = ReportingPeriod::new(2025, deadline);
        let now = deadline - Duration::seconds(seconds_early);
        let from = status.unwrap_or_default();

        for result in [
            DeclarationLifecycle::submit(status, &period, now),
            DeclarationLifecycle::rectify(status, &period, now),
        ] {
            if let Ok(Transition::To(to)) = result {
                prop_assert!(DeclarationLifecycle::is_valid_transition(from, to));
            }
        }
    }
}
