//! Spreadsheet codec between entries and CSV files.
//!
//! Exports list every analytic account in catalog order, whether or not a
//! value was entered. Imports resolve rows by account name at a fixed column
//! position and are deliberately lossy: unknown account names are dropped and
//! unreadable or ambiguous numbers read as zero, each reported with its line.
//! Only a file that is not CSV at all is an error.

mod codec;
mod error;

#[cfg(test)]
mod codec_props;

pub use codec::{
    EXPENSE_HEADERS, REVENUE_HEADERS, export_expenses, export_history, export_revenues,
    ParsedRow, import_expenses, import_revenues, parse_amount, write_table,
};
pub use error::{AmountError, CellError, SheetError};
