//! Legislation error types.

use declara_shared::AppError;
use thiserror::Error;

use crate::storage::StorageError;
use crate::store::StoreError;

/// Errors that can occur while managing documents.
#[derive(Debug, Error)]
pub enum LegislationError {
    /// Bad upload: not a PDF, too large, empty name.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Only the national council and administrators manage documents.
    #[error("Only the national council may manage legislation documents")]
    Forbidden,

    /// No such document.
    #[error("Document not found")]
    NotFound,

    /// Object storage failure.
    #[error(transparent)]
    Storage(StorageError),

    /// Backing store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<StorageError> for LegislationError {
    fn from(err: StorageError) -> Self {
        if err.is_rejection() {
            Self::Validation(err.to_string())
        } else {
            Self::Storage(err)
        }
    }
}

impl LegislationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Storage(_) | Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Store(_) => "DATABASE_ERROR",
        }
    }
}

impl From<LegislationError> for AppError {
    fn from(err: LegislationError) -> Self {
        match err {
            LegislationError::Validation(msg) => Self::Validation(msg),
            LegislationError::Forbidden => Self::Forbidden(err.to_string()),
            LegislationError::NotFound => Self::NotFound(err.to_string()),
            LegislationError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                Self::ExternalService(e.to_string())
            }
            LegislationError::Store(e) => e.into(),
        }
    }
}
