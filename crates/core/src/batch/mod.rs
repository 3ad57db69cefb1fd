//! Administrative batch jobs over many organizations.
//!
//! Jobs run organization by organization and report a per-item outcome so a
//! partial failure is visible instead of aborting silently.

mod service;
mod types;

pub use service::SeedService;
pub use types::{BatchItem, BatchOutcome, BatchReport};
