//! Entry error types.

use declara_shared::AppError;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::sheet::SheetError;
use crate::store::StoreError;

/// Errors that can occur when reading or writing entries.
#[derive(Debug, Error)]
pub enum EntryError {
    /// The figures violate an entry invariant. Nothing was written.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The account cannot receive a value.
    #[error(transparent)]
    Account(#[from] CatalogError),

    /// The organization's declaration is submitted and must be rectified first.
    #[error("Declaration is submitted; rectify it before editing")]
    Locked,

    /// The reporting period deadline has passed.
    #[error("Reporting period {year} is closed")]
    DeadlinePassed {
        /// Year of the closed period.
        year: i32,
    },

    /// The caller may not touch this organization's data.
    #[error("Not allowed: {0}")]
    Forbidden(String),

    /// A destructive action was not confirmed with the expected phrase.
    #[error("Confirmation phrase does not match")]
    ConfirmationMismatch,

    /// The uploaded spreadsheet could not be read.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// Backing store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EntryError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Account(_) | Self::ConfirmationMismatch | Self::Sheet(_) => {
                400
            }
            Self::Forbidden(_) => 403,
            Self::Locked | Self::DeadlinePassed { .. } => 423,
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Account(CatalogError::UnknownAccount(_)) => "UNKNOWN_ACCOUNT",
            Self::Account(CatalogError::SyntheticAccount(_)) => "SYNTHETIC_ACCOUNT",
            Self::Locked => "DECLARATION_LOCKED",
            Self::DeadlinePassed { .. } => "REPORTING_PERIOD_CLOSED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::ConfirmationMismatch => "CONFIRMATION_MISMATCH",
            Self::Sheet(_) => "UNREADABLE_SPREADSHEET",
            Self::Store(_) => "DATABASE_ERROR",
        }
    }
}

impl From<EntryError> for AppError {
    fn from(err: EntryError) -> Self {
        match err {
            EntryError::Validation(_)
            | EntryError::Account(_)
            | EntryError::ConfirmationMismatch
            | EntryError::Sheet(_) => Self::Validation(err.to_string()),
            EntryError::Locked => Self::Locked(err.to_string()),
            EntryError::DeadlinePassed { .. } => Self::PeriodClosed(err.to_string()),
            EntryError::Forbidden(msg) => Self::Forbidden(msg),
            EntryError::Store(e) => e.into(),
        }
    }
}
