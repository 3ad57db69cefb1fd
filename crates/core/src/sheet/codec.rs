//! CSV encoding and decoding.

use std::str::FromStr as _;

use rust_decimal::Decimal;

use super::error::{AmountError, CellError, SheetError};
use crate::catalog::{Account, Catalog};
use crate::consolidation::BiTable;
use crate::entries::{EntryChange, EntryField, ExpenseAmounts, ExpenseValues, RevenueValues};

/// Header of the expense spreadsheet.
pub const EXPENSE_HEADERS: [&str; 6] = [
    "Grupo",
    "Subgrupo",
    "Tipo",
    "Conta",
    "Total",
    "Atividade Finalística",
];

/// Header of the revenue spreadsheet.
pub const REVENUE_HEADERS: [&str; 5] = ["Grupo", "Subgrupo", "Tipo", "Conta", "Valor Arrecadado"];

const HISTORY_HEADERS: [&str; 7] = [
    "Data",
    "Conta",
    "Campo",
    "Valor Anterior",
    "Novo Valor",
    "Alterado Por",
    "Tipo",
];

// Fixed column positions of data rows.
const NAME_COLUMN: usize = 3;
const FIRST_VALUE_COLUMN: usize = 4;
const SECOND_VALUE_COLUMN: usize = 5;

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, SheetError> {
    writer
        .into_inner()
        .map_err(|e| SheetError::Write(e.to_string()))
}

/// Writes an amount with exactly two decimal places.
fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn account_columns(account: &Account) -> [&'static str; 4] {
    [account.group, account.subgroup, account.kind.label(), account.name]
}

/// Reads a numeric cell.
///
/// Two formats are accepted: plain decimals (`1234.56`, `1,234.56`) and
/// Brazilian formatting (`1.234,56`, `R$ 1.234,56`). When both separators
/// appear the last one is the decimal mark. A lone separator followed by
/// exactly three digits (`1,234` or `1.234`) is ambiguous. Blank cells read
/// as zero.
///
/// # Errors
///
/// Returns `AmountError::Ambiguous` or `AmountError::Invalid`.
pub fn parse_amount(cell: &str) -> Result<Decimal, AmountError> {
    let raw = cell.trim();
    let body = raw.strip_prefix("R$").unwrap_or(raw).trim_start();
    if body.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let invalid = || AmountError::Invalid(raw.to_string());

    let (negative, number) = match body.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, body),
    };
    if number.is_empty()
        || !number
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
    {
        return Err(invalid());
    }

    let dots = number.matches('.').count();
    let commas = number.matches(',').count();
    let (integer, fraction) = match (dots, commas) {
        (0, 0) => (number.to_string(), ""),
        (1, 0) => split_decimal(raw, number, '.')?,
        (0, 1) => split_decimal(raw, number, ',')?,
        (_, 0) => (ungroup(raw, number, '.')?, ""),
        (0, _) => (ungroup(raw, number, ',')?, ""),
        _ => {
            let (thousands, decimal) = if number.rfind('.') > number.rfind(',') {
                (',', '.')
            } else {
                ('.', ',')
            };
            let (grouped, fraction) = number.rsplit_once(decimal).ok_or_else(invalid)?;
            if grouped.contains(decimal) || fraction.is_empty() {
                return Err(invalid());
            }
            (ungroup(raw, grouped, thousands)?, fraction)
        }
    };

    let text = if fraction.is_empty() {
        integer
    } else {
        format!("{integer}.{fraction}")
    };
    let value = Decimal::from_str(&text).map_err(|_| invalid())?;
    Ok(if negative { -value } else { value })
}

/// `int<sep>frac` with a single separator taken as the decimal mark.
fn split_decimal<'a>(
    raw: &str,
    number: &'a str,
    separator: char,
) -> Result<(String, &'a str), AmountError> {
    let (integer, fraction) = number
        .split_once(separator)
        .ok_or_else(|| AmountError::Invalid(raw.to_string()))?;
    if fraction.is_empty() {
        return Err(AmountError::Invalid(raw.to_string()));
    }
    if fraction.len() == 3 && !integer.is_empty() && integer != "0" {
        return Err(AmountError::Ambiguous(raw.to_string()));
    }
    let integer = if integer.is_empty() { "0" } else { integer };
    Ok((integer.to_string(), fraction))
}

/// Removes thousands separators, checking the groups are 1-3 then 3 digits.
fn ungroup(raw: &str, number: &str, separator: char) -> Result<String, AmountError> {
    let mut groups = number.split(separator);
    let first = groups.next().unwrap_or_default();
    let well_formed = (1..=3).contains(&first.len()) && groups.clone().all(|g| g.len() == 3);
    if !well_formed {
        return Err(AmountError::Invalid(raw.to_string()));
    }
    Ok(std::iter::once(first).chain(groups).collect())
}

/// One imported row resolved to a catalog account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow<T> {
    /// Line of the row in the file, header included.
    pub line: u64,
    /// Account code.
    pub account_id: String,
    /// Parsed figures, unreadable cells read as zero.
    pub value: T,
    /// Cells that could not be read.
    pub issues: Vec<CellError>,
}

/// Reads the amount at `column`, recording unreadable cells.
fn read_amount(
    record: &csv::StringRecord,
    column: usize,
    header: &'static str,
    issues: &mut Vec<CellError>,
) -> Decimal {
    match record.get(column).map(parse_amount) {
        None => Decimal::ZERO,
        Some(Ok(value)) => value,
        Some(Err(error)) => {
            issues.push(CellError {
                line: record.position().map_or(0, csv::Position::line),
                column: header,
                error,
            });
            Decimal::ZERO
        }
    }
}

/// Iterates data rows as `(account, record)`, dropping unknown account names.
fn resolved_rows(
    catalog: Catalog,
    file: &[u8],
) -> Result<Vec<(&'static Account, csv::StringRecord)>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    reader.headers()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(account) = record
            .get(NAME_COLUMN)
            .and_then(|name| catalog.find_by_name(name))
        else {
            continue;
        };
        rows.push((account, record));
    }
    Ok(rows)
}

/// Serializes expense values, one row per analytic account.
///
/// # Errors
///
/// Returns `SheetError::Write` if the output cannot be produced.
pub fn export_expenses(values: &ExpenseValues) -> Result<Vec<u8>, SheetError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPENSE_HEADERS)?;
    for account in Catalog::expense().analytic() {
        let amounts = values.get(account.code).copied().unwrap_or_default();
        let [group, subgroup, kind, name] = account_columns(account);
        writer.write_record([
            group,
            subgroup,
            kind,
            name,
            &format_amount(amounts.total),
            &format_amount(amounts.finalistica),
        ])?;
    }
    finish(writer)
}

/// Parses an expense spreadsheet in file order.
///
/// Amounts are not validated here.
///
/// # Errors
///
/// Returns `SheetError::Unreadable` for files that are not CSV.
pub fn import_expenses(file: &[u8]) -> Result<Vec<ParsedRow<ExpenseAmounts>>, SheetError> {
    Ok(resolved_rows(Catalog::expense(), file)?
        .into_iter()
        .map(|(account, record)| {
            let mut issues = Vec::new();
            let total = read_amount(
                &record,
                FIRST_VALUE_COLUMN,
                EXPENSE_HEADERS[FIRST_VALUE_COLUMN],
                &mut issues,
            );
            let finalistica = read_amount(
                &record,
                SECOND_VALUE_COLUMN,
                EXPENSE_HEADERS[SECOND_VALUE_COLUMN],
                &mut issues,
            );
            ParsedRow {
                line: record.position().map_or(0, csv::Position::line),
                account_id: account.code.to_string(),
                value: ExpenseAmounts { total, finalistica },
                issues,
            }
        })
        .collect())
}

/// Serializes revenue values, one row per analytic account.
///
/// # Errors
///
/// Returns `SheetError::Write` if the output cannot be produced.
pub fn export_revenues(values: &RevenueValues) -> Result<Vec<u8>, SheetError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REVENUE_HEADERS)?;
    for account in Catalog::revenue().analytic() {
        let value = values.get(account.code).copied().unwrap_or_default();
        let [group, subgroup, kind, name] = account_columns(account);
        writer.write_record([group, subgroup, kind, name, &format_amount(value)])?;
    }
    finish(writer)
}

/// Parses a revenue spreadsheet in file order.
///
/// # Errors
///
/// Returns `SheetError::Unreadable` for files that are not CSV.
pub fn import_revenues(file: &[u8]) -> Result<Vec<ParsedRow<Decimal>>, SheetError> {
    Ok(resolved_rows(Catalog::revenue(), file)?
        .into_iter()
        .map(|(account, record)| {
            let mut issues = Vec::new();
            let value = read_amount(
                &record,
                FIRST_VALUE_COLUMN,
                REVENUE_HEADERS[FIRST_VALUE_COLUMN],
                &mut issues,
            );
            ParsedRow {
                line: record.position().map_or(0, csv::Position::line),
                account_id: account.code.to_string(),
                value,
                issues,
            }
        })
        .collect())
}

/// Renders a BI table.
///
/// # Errors
///
/// Returns `SheetError::Write` if the output cannot be produced.
pub fn write_table(table: &BiTable) -> Result<Vec<u8>, SheetError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.organization.clone());
        record.extend(row.values.iter().map(ToString::to_string));
        writer.write_record(&record)?;
    }
    finish(writer)
}

fn field_label(field: EntryField) -> &'static str {
    match field {
        EntryField::Total => "Total",
        EntryField::Finalistica => "Atividade Finalística",
        EntryField::Value => "Valor",
    }
}

/// Renders entry change history.
///
/// # Errors
///
/// Returns `SheetError::Write` if the output cannot be produced.
pub fn export_history(changes: &[EntryChange]) -> Result<Vec<u8>, SheetError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HISTORY_HEADERS)?;
    for change in changes {
        writer.write_record([
            change.changed_at.format("%d/%m/%Y %H:%M:%S").to_string(),
            change.account_id.clone(),
            field_label(change.field).to_string(),
            change.previous_value.to_string(),
            change.new_value.to_string(),
            change.changed_by.to_string(),
            if change.is_recovery {
                "Recuperação"
            } else {
                "Alteração Manual"
            }
            .to_string(),
        ])?;
    }
    finish(writer)
}
