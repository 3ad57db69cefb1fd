//! Message error types.

use declara_shared::AppError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur when sending or reading messages.
#[derive(Debug, Error)]
pub enum MessageError {
    /// Empty or oversized content.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The sender may not use this direction.
    #[error("Not allowed: {0}")]
    Forbidden(String),

    /// No such message, or not visible to the caller.
    #[error("Message not found")]
    NotFound,

    /// Backing store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MessageError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound => 404,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Store(_) => "DATABASE_ERROR",
        }
    }
}

impl From<MessageError> for AppError {
    fn from(err: MessageError) -> Self {
        match err {
            MessageError::Validation(msg) => Self::Validation(msg),
            MessageError::Forbidden(msg) => Self::Forbidden(msg),
            MessageError::NotFound => Self::NotFound(err.to_string()),
            MessageError::Store(e) => e.into(),
        }
    }
}
