//! Cross-organization consolidation and BI export tables.
//!
//! # Modules
//!
//! - `aggregate` - Pure folding of stored rows into per-organization maps
//! - `table` - Wide BI tables, one row per organization
//! - `service` - Privileged read path over the repositories

pub mod aggregate;
pub mod service;
pub mod table;

#[cfg(test)]
mod aggregate_props;

pub use aggregate::{
    ConsolidatedExpenses, ConsolidatedRevenues, consolidate_expenses, consolidate_revenues,
};
pub use service::{ConsolidationError, ConsolidationService};
pub use table::{BiRow, BiTable, bi_expense_table, bi_revenue_table};
