//! Backing store boundary.
//!
//! Every repository trait in this crate reports failures of the underlying
//! store through [`StoreError`]. Domain errors wrap it so callers can tell a
//! rejected request from an unavailable backend.

use thiserror::Error;

/// Failure of the backing store (network, backend, constraint).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("store operation failed: {0}")]
    Backend(String),

    /// A stored value could not be mapped back into a domain type.
    #[error("corrupt stored value: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Create a backend error.
    #[must_use]
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a corrupt value error.
    #[must_use]
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}

impl From<StoreError> for declara_shared::AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "store failure");
        Self::Database(err.to_string())
    }
}
