//! Lock guard for entry-editing surfaces.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::DeclarationStatus;

/// What an entry-editing surface may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Entries are writable.
    Open,
    /// Locked by a submitted declaration; a rectification is offered.
    Submitted,
    /// The deadline has passed; nothing is available.
    Closed,
}

impl LockState {
    /// Returns true unless entries are writable.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        !matches!(self, Self::Open)
    }

    /// Returns true when a rectification may lift the lock.
    #[must_use]
    pub fn can_rectify(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

/// Evaluates the lock rule.
pub struct LockGuard;

impl LockGuard {
    /// `locked = now > deadline || (status == Submitted && !rectify_ack)`.
    ///
    /// `rectify_ack` is a UI hint from the session that just rectified. Write
    /// paths always pass `false` and rely on the persisted status.
    #[must_use]
    pub fn evaluate(
        status: DeclarationStatus,
        now: DateTime<Utc>,
        deadline: DateTime<Utc>,
        rectify_ack: bool,
    ) -> LockState {
        if now > deadline {
            LockState::Closed
        } else if status == DeclarationStatus::Submitted && !rectify_ack {
            LockState::Submitted
        } else {
            LockState::Open
        }
    }
}
