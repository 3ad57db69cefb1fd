//! Repository implementations of the `declara-core` persistence traits.

pub mod action_log;
pub mod activity_log;
pub mod declaration;
pub mod entry;
pub mod legislation;
pub mod message;
pub mod organization;
pub mod registration;
pub mod responsible;
pub mod user;

pub use action_log::ActionLogRepository;
pub use activity_log::ActivityLogRepository;
pub use declaration::DeclarationRepository;
pub use entry::EntryRepository;
pub use legislation::LegislationRepository;
pub use message::MessageRepository;
pub use organization::OrganizationRepository;
pub use registration::RegistrationRepository;
pub use responsible::ResponsibleRepository;
pub use user::UserRepository;

use declara_core::store::StoreError;
use sea_orm::DbErr;

/// Maps a driver error into the core store error.
pub(crate) fn db_err(err: DbErr) -> StoreError {
    tracing::error!(error = %err, "database error");
    StoreError::backend(err.to_string())
}

/// Builds the error for a stored value that no domain type accepts.
pub(crate) fn corrupt(column: &str, value: &str) -> StoreError {
    StoreError::corrupt(format!("{column} = {value:?}"))
}
