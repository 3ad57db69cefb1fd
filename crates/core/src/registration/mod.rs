//! Self-service registration requests reviewed by administrators.
//!
//! # Modules
//!
//! - `types` - Requests and their review status
//! - `error` - Registration-specific error types
//! - `service` - Submission, approval and rejection

pub mod error;
pub mod service;
pub mod types;

pub use error::RegistrationError;
pub use service::{DEFAULT_REJECTION_REASON, RegistrationRepository, RegistrationService};
pub use types::{NewRegistration, RegistrationRequest, RegistrationStatus, normalize_cpf};
