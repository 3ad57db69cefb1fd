//! Declaration error types.

use declara_shared::AppError;
use thiserror::Error;

use super::types::DeclarationStatus;
use crate::store::StoreError;

/// Errors that can occur during declaration operations.
#[derive(Debug, Error)]
pub enum DeclarationError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: DeclarationStatus,
        /// The attempted target status.
        to: DeclarationStatus,
    },

    /// The reporting period deadline has passed.
    #[error("Reporting period {year} is closed")]
    DeadlinePassed {
        /// Year of the closed period.
        year: i32,
    },

    /// No reporting period is configured for the year.
    #[error("Reporting period {0} is not configured")]
    UnknownPeriod(i32),

    /// Missing or malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The caller may not act on this organization.
    #[error("Not allowed: {0}")]
    Forbidden(String),

    /// Backing store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DeclarationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 409,
            Self::DeadlinePassed { .. } => 423,
            Self::UnknownPeriod(_) => 404,
            Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::DeadlinePassed { .. } => "REPORTING_PERIOD_CLOSED",
            Self::UnknownPeriod(_) => "UNKNOWN_PERIOD",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Store(_) => "DATABASE_ERROR",
        }
    }
}

impl From<DeclarationError> for AppError {
    fn from(err: DeclarationError) -> Self {
        match err {
            DeclarationError::InvalidTransition { .. } => Self::Conflict(err.to_string()),
            DeclarationError::DeadlinePassed { .. } => Self::PeriodClosed(err.to_string()),
            DeclarationError::UnknownPeriod(_) => Self::NotFound(err.to_string()),
            DeclarationError::Validation(msg) => Self::Validation(msg),
            DeclarationError::Forbidden(msg) => Self::Forbidden(msg),
            DeclarationError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = DeclarationError::InvalidTransition {
            from: DeclarationStatus::Submitted,
            to: DeclarationStatus::Submitted,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("submitted"));
    }

    #[test]
    fn test_deadline_passed_maps_to_period_closed() {
        let app: AppError = DeclarationError::DeadlinePassed { year: 2025 }.into();
        assert_eq!(app.status_code(), 423);
        assert_eq!(app.error_code(), "REPORTING_PERIOD_CLOSED");
    }

    #[test]
    fn test_store_error_is_generic() {
        let app: AppError = DeclarationError::Store(StoreError::backend("reset")).into();
        assert_eq!(app.public_message(), "An error occurred");
    }
}
