//! Spreadsheet error types.

use thiserror::Error;

/// Spreadsheet codec errors.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The file is not a readable CSV document.
    #[error("unreadable spreadsheet: {0}")]
    Unreadable(String),

    /// Writing the output failed.
    #[error("failed to write spreadsheet: {0}")]
    Write(String),
}

impl From<csv::Error> for SheetError {
    fn from(err: csv::Error) -> Self {
        Self::Unreadable(err.to_string())
    }
}

/// A numeric cell that could not be read as an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Not a number in either accepted format.
    #[error("'{0}' is not a number")]
    Invalid(String),

    /// Readable both as a thousands group and as a decimal fraction.
    #[error("'{0}' is ambiguous; write 1234.56 or 1.234,56")]
    Ambiguous(String),
}

/// An unreadable cell of an imported row. The cell is read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column '{column}': {error}; read as 0")]
pub struct CellError {
    /// Line of the row in the file, header included.
    pub line: u64,
    /// Header of the offending column.
    pub column: &'static str,
    /// What was wrong with the cell.
    pub error: AmountError,
}
