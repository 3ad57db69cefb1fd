//! Chart of accounts.
//!
//! Two static catalogs, one for expenses and one for revenues. Codes are
//! dotted paths (`1.1.1.1`); a synthetic account is the parent of every
//! account whose code extends its own.
//!
//! # Modules
//!
//! - `types` - Account, AccountKind and the Catalog lookups
//! - `chart` - The static account lists

mod chart;
mod types;

pub use types::{Account, AccountKind, Catalog, CatalogError};
