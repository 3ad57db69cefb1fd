//! Moderation error types.

use declara_shared::AppError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while moderating users.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// The caller is not an administrator, or the target is protected.
    #[error("Not allowed: {0}")]
    Forbidden(String),

    /// No such user.
    #[error("User not found")]
    NotFound,

    /// The confirmation does not match the target's e-mail.
    #[error("Confirmation does not match the user's e-mail")]
    ConfirmationMismatch,

    /// Backing store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ModerationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ConfirmationMismatch => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound => 404,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfirmationMismatch => "CONFIRMATION_MISMATCH",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Store(_) => "DATABASE_ERROR",
        }
    }
}

impl From<ModerationError> for AppError {
    fn from(err: ModerationError) -> Self {
        match err {
            ModerationError::ConfirmationMismatch => Self::Validation(err.to_string()),
            ModerationError::Forbidden(msg) => Self::Forbidden(msg),
            ModerationError::NotFound => Self::NotFound(err.to_string()),
            ModerationError::Store(e) => e.into(),
        }
    }
}
