//! Legislation documents published by the national council.

mod error;
mod service;

pub use error::LegislationError;
pub use service::{LegislationDocument, LegislationRepository, LegislationService, NewDocument};
