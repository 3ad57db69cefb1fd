//! Declaration lifecycle.
//!
//! A declaration moves `Draft → Submitted` when an organization sends its
//! figures and back to `Draft` through an explicit rectification. Once the
//! period deadline passes, no transition is available and entries stay
//! read-only.
//!
//! # Modules
//!
//! - `types` - Status, reporting period and stored declaration
//! - `guard` - Lock rule for entry-editing surfaces
//! - `lifecycle` - Pure state transitions
//! - `responsible` - Responsible persons attached to a declaration
//! - `service` - Persistence-backed submission and rectification

pub mod error;
pub mod guard;
pub mod lifecycle;
pub mod responsible;
pub mod service;
pub mod types;

#[cfg(test)]
mod lifecycle_props;

pub use error::DeclarationError;
pub use guard::{LockGuard, LockState};
pub use lifecycle::{DeclarationLifecycle, Transition};
pub use responsible::{DocumentType, ResponsibleData, ResponsibleRepository};
pub use service::{DeclarationRepository, DeclarationService, compute_totals};
pub(crate) use service::persisted_status;
pub use types::{Declaration, DeclarationStatus, DeclarationTotals, ReportingPeriod};
