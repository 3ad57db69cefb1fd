//! Registration error types.

use declara_shared::AppError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during registration and review.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The form is incomplete or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request does not exist or was already reviewed.
    #[error("Registration request not found or already processed")]
    NotFound,

    /// Only administrators review requests.
    #[error("Only administrators may review registrations")]
    Forbidden,

    /// Backing store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistrationError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Store(_) => "DATABASE_ERROR",
        }
    }
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation(msg) => Self::Validation(msg),
            RegistrationError::NotFound => Self::NotFound(err.to_string()),
            RegistrationError::Forbidden => Self::Forbidden(err.to_string()),
            RegistrationError::Store(e) => e.into(),
        }
    }
}
