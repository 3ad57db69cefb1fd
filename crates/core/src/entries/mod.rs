//! Entry store: per-organization, per-account expense and revenue figures.
//!
//! # Modules
//!
//! - `types` - Amounts, rows and change history records
//! - `error` - Entry-specific error types
//! - `service` - Guarded writes, spreadsheet import/export, snapshot restore
//!   and data wipe
//! - `report` - Printable reports with synthetic subtotals

pub mod error;
pub mod report;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::EntryError;
pub use report::{Report, ReportLine};
pub use service::{CLEAR_DATA_CONFIRMATION, EntryRepository, EntryService};
pub use types::{
    ClearedData, EntryChange, EntryField, ExpenseAmounts, ExpenseRow, ExpenseValues,
    ImportReport, ImportedRow, RestoredSnapshot, RevenueRow, RevenueValues, validate_revenue,
};
