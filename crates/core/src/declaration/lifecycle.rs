//! Declaration state transitions.

use chrono::{DateTime, Utc};

use super::error::DeclarationError;
use super::types::{DeclarationStatus, ReportingPeriod};

/// Result of a valid transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Persist the new status.
    To(DeclarationStatus),
    /// Nothing to do.
    Unchanged,
}

/// Stateless rules for moving a declaration between statuses.
///
/// `current` is `None` when no declaration was ever stored for the period,
/// which behaves as `Draft`.
pub struct DeclarationLifecycle;

impl DeclarationLifecycle {
    /// Draft → Submitted.
    ///
    /// # Errors
    ///
    /// * `DeclarationError::DeadlinePassed` after the deadline
    /// * `DeclarationError::InvalidTransition` if already submitted
    pub fn submit(
        current: Option<DeclarationStatus>,
        period: &ReportingPeriod,
        now: DateTime<Utc>,
    ) -> Result<Transition, DeclarationError> {
        if period.is_closed(now) {
            return Err(DeclarationError::DeadlinePassed { year: period.year });
        }
        let from = current.unwrap_or_default();
        let to = DeclarationStatus::Submitted;
        if Self::is_valid_transition(from, to) {
            Ok(Transition::To(to))
        } else {
            Err(DeclarationError::InvalidTransition { from, to })
        }
    }

    /// Submitted → Draft.
    ///
    /// A draft or absent declaration is already editable, so this is a no-op.
    ///
    /// # Errors
    ///
    /// `DeclarationError::DeadlinePassed` after the deadline, whatever the status.
    pub fn rectify(
        current: Option<DeclarationStatus>,
        period: &ReportingPeriod,
        now: DateTime<Utc>,
    ) -> Result<Transition, DeclarationError> {
        if period.is_closed(now) {
            return Err(DeclarationError::DeadlinePassed { year: period.year });
        }
        match current {
            Some(from) if Self::is_valid_transition(from, DeclarationStatus::Draft) => {
                Ok(Transition::To(DeclarationStatus::Draft))
            }
            _ => Ok(Transition::Unchanged),
        }
    }

    /// The two edges of the status graph.
    pub(crate) fn is_valid_transition(from: DeclarationStatus, to: DeclarationStatus) -> bool {
        matches!(
            (from, to),
            (DeclarationStatus::Draft, DeclarationStatus::Submitted)
                | (DeclarationStatus::Submitted, DeclarationStatus::Draft)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn open_period() -> (ReportingPeriod, DateTime<Utc>) {
        let now = Utc::now();
        (ReportingPeriod::new(2025, now + Duration::days(30)), now)
    }

    #[test]
    fn test_submit_from_draft_or_absent() {
        let (period, now) = open_period();
        assert_eq!(
            DeclarationLifecycle::submit(None, &period, now).unwrap(),
            Transition::To(DeclarationStatus::Submitted)
        );
        assert_eq!(
            DeclarationLifecycle::submit(Some(DeclarationStatus::Draft), &period, now).unwrap(),
            Transition::To(DeclarationStatus::Submitted)
        );
    }

    #[test]
    fn test_submit_twice_is_rejected() {
        let (period, now) = open_period();
        let err =
            DeclarationLifecycle::submit(Some(DeclarationStatus::Submitted), &period, now)
                .unwrap_err();
        assert!(matches!(err, DeclarationError::InvalidTransition { .. }));
    }

    #[test]
    fn test_rectify_submitted() {
        let (period, now) = open_period();
        assert_eq!(
            DeclarationLifecycle::rectify(Some(DeclarationStatus::Submitted), &period, now)
                .unwrap(),
            Transition::To(DeclarationStatus::Draft)
        );
    }

    #[test]
    fn test_rectify_without_submission_is_noop() {
        let (period, now) = open_period();
        assert_eq!(
            DeclarationLifecycle::rectify(None, &period, now).unwrap(),
            Transition::Unchanged
        );
        assert_eq!(
            DeclarationLifecycle::rectify(Some(DeclarationStatus::Draft), &period, now).unwrap(),
            Transition::Unchanged
        );
    }

    #[test]
    fn test_deadline_blocks_every_transition() {
        let now = Utc::now();
        let period = ReportingPeriod::new(2025, now - Duration::seconds(1));
        for status in [None, Some(DeclarationStatus::Draft), Some(DeclarationStatus::Submitted)] {
            assert!(matches!(
                DeclarationLifecycle::submit(status, &period, now),
                Err(DeclarationError::DeadlinePassed { year: 2025 })
            ));
            assert!(matches!(
                DeclarationLifecycle::rectify(status, &period, now),
                Err(DeclarationError::DeadlinePassed { year: 2025 })
            ));
        }
    }

    #[test]
    fn test_is_valid_transition() {
        assert!(DeclarationLifecycle::is_valid_transition(
            DeclarationStatus::Draft,
            DeclarationStatus::Submitted
        ));
        assert!(!DeclarationLifecycle::is_valid_transition(
            DeclarationStatus::Draft,
            DeclarationStatus::Draft
        ));
    }
}
