//! Core business logic for Declara.
//!
//! This crate contains the business rules with no web or database
//! dependencies. Persistence is reached through the repository traits each
//! module defines; `declara-db` implements them.
//!
//! # Modules
//!
//! - `catalog` - Static expense and revenue charts of accounts
//! - `organization` - The national and regional councils
//! - `entries` - Per-account figures, guarded writes and spreadsheet I/O
//! - `declaration` - Submission, rectification and the edit lock
//! - `consolidation` - Cross-organization views and BI tables
//! - `sheet` - CSV codec for entries, history and BI tables
//! - `batch` - Administrative seeding jobs
//! - `user`, `registration`, `moderation`, `audit` - Accounts and their review
//! - `messages` - Notices between councils
//! - `legislation`, `storage` - Published documents and their files

pub mod audit;
pub mod batch;
pub mod catalog;
pub mod consolidation;
pub mod declaration;
pub mod entries;
pub mod legislation;
pub mod messages;
pub mod moderation;
pub mod organization;
pub mod registration;
pub mod sheet;
pub mod storage;
pub mod store;
pub mod user;

#[cfg(test)]
mod testing;
