//! Shared types, errors, and configuration for Declara.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Organization kinds and user roles carried by sessions
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT session validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, Principal};
pub use config::{AppConfig, ReportingConfig, ReportingPeriodConfig, StorageSettings};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::{OrganizationId, OrganizationKind, PageRequest, PageResponse, Role, UserId};
