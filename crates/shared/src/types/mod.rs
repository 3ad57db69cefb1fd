//! Common types used across the application.

pub mod id;
pub mod org;
pub mod pagination;

pub use id::*;
pub use org::{OrganizationKind, Role};
pub use pagination::{PageMeta, PageRequest, PageResponse};
