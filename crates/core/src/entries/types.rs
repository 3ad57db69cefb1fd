//! Entry domain types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use declara_shared::types::{OrganizationId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::EntryError;

/// Decimal places kept by the store.
pub const AMOUNT_SCALE: u32 = 2;

/// Exclusive magnitude bound of a stored amount, `10^16`.
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(1_874_919_424, 2_328_306, 0, false, 0);

/// Checks that `value` fits a `NUMERIC(18,2)` column.
fn check_storable(field: &str, value: Decimal) -> Result<(), EntryError> {
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(EntryError::validation(format!(
            "{field} ({value}) has more than {AMOUNT_SCALE} decimal places"
        )));
    }
    if value.abs() >= AMOUNT_LIMIT {
        return Err(EntryError::validation(format!(
            "{field} ({value}) is out of range"
        )));
    }
    Ok(())
}

/// Expense figures of one account.
///
/// Invariant once validated: `0 <= finalistica <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpenseAmounts {
    /// Total spent.
    pub total: Decimal,
    /// Portion attributable to the core mission activity.
    pub finalistica: Decimal,
}

impl ExpenseAmounts {
    /// Zero amounts.
    pub const ZERO: Self = Self {
        total: Decimal::ZERO,
        finalistica: Decimal::ZERO,
    };

    /// Builds validated amounts.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::Validation` if either value is negative, does not
    /// fit two decimal places below `10^16`, or `finalistica` exceeds `total`.
    pub fn new(total: Decimal, finalistica: Decimal) -> Result<Self, EntryError> {
        let amounts = Self { total, finalistica };
        amounts.validate()?;
        Ok(amounts)
    }

    /// Checks the invariant.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::Validation` with a readable reason.
    pub fn validate(&self) -> Result<(), EntryError> {
        if self.total < Decimal::ZERO {
            return Err(EntryError::validation("total must not be negative"));
        }
        if self.finalistica < Decimal::ZERO {
            return Err(EntryError::validation("finalistica must not be negative"));
        }
        check_storable("total", self.total)?;
        check_storable("finalistica", self.finalistica)?;
        if self.finalistica > self.total {
            return Err(EntryError::validation(format!(
                "finalistica ({}) cannot exceed total ({})",
                self.finalistica, self.total
            )));
        }
        Ok(())
    }

    /// Support-activity amount, `total - finalistica`.
    #[must_use]
    pub fn apoio(&self) -> Decimal {
        self.total - self.finalistica
    }
}

/// Validates a revenue value.
///
/// # Errors
///
/// Returns `EntryError::Validation` for negative values and values that do
/// not fit two decimal places below `10^16`.
pub fn validate_revenue(value: Decimal) -> Result<(), EntryError> {
    if value < Decimal::ZERO {
        return Err(EntryError::validation("value must not be negative"));
    }
    check_storable("value", value)
}

/// Expense values of one organization keyed by account code.
pub type ExpenseValues = BTreeMap<String, ExpenseAmounts>;

/// Revenue values of one organization keyed by account code.
pub type RevenueValues = BTreeMap<String, Decimal>;

/// A stored expense row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRow {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Account code.
    pub account_id: String,
    /// Figures.
    pub amounts: ExpenseAmounts,
}

/// A stored revenue row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueRow {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Account code.
    pub account_id: String,
    /// Amount collected.
    pub value: Decimal,
}

/// Field of an entry that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryField {
    /// Expense total.
    Total,
    /// Expense finalística share.
    Finalistica,
    /// Revenue value.
    Value,
}

impl EntryField {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Finalistica => "finalistica",
            Self::Value => "value",
        }
    }

    /// Parses a field from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "total" => Some(Self::Total),
            "finalistica" => Some(Self::Finalistica),
            "value" => Some(Self::Value),
            _ => None,
        }
    }
}

impl fmt::Display for EntryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded change of an entry field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryChange {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Account code.
    pub account_id: String,
    /// Field that changed.
    pub field: EntryField,
    /// Value before the write (zero when the row did not exist).
    pub previous_value: Decimal,
    /// Value after the write.
    pub new_value: Decimal,
    /// Who wrote it.
    pub changed_by: UserId,
    /// When.
    pub changed_at: DateTime<Utc>,
    /// Written by a snapshot restore rather than a manual edit.
    #[serde(default)]
    pub is_recovery: bool,
}

impl EntryChange {
    /// Marks the change as written by a snapshot restore.
    #[must_use]
    pub fn into_recovery(self) -> Self {
        Self {
            is_recovery: true,
            ..self
        }
    }
}

/// Computes the history records produced by an expense write.
#[must_use]
pub fn expense_changes(
    organization_id: OrganizationId,
    account_id: &str,
    previous: Option<ExpenseAmounts>,
    next: ExpenseAmounts,
    changed_by: UserId,
    changed_at: DateTime<Utc>,
) -> Vec<EntryChange> {
    let previous = previous.unwrap_or_default();
    [
        (EntryField::Total, previous.total, next.total),
        (EntryField::Finalistica, previous.finalistica, next.finalistica),
    ]
    .into_iter()
    .filter(|(_, before, after)| before != after)
    .map(|(field, before, after)| EntryChange {
        organization_id,
        account_id: account_id.to_string(),
        field,
        previous_value: before,
        new_value: after,
        changed_by,
        changed_at,
        is_recovery: false,
    })
    .collect()
}

/// Computes the history record produced by a revenue write.
#[must_use]
pub fn revenue_change(
    organization_id: OrganizationId,
    account_id: &str,
    previous: Option<Decimal>,
    next: Decimal,
    changed_by: UserId,
    changed_at: DateTime<Utc>,
) -> Option<EntryChange> {
    let previous = previous.unwrap_or_default();
    (previous != next).then(|| EntryChange {
        organization_id,
        account_id: account_id.to_string(),
        field: EntryField::Value,
        previous_value: previous,
        new_value: next,
        changed_by,
        changed_at,
        is_recovery: false,
    })
}

/// Result of importing one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedRow {
    /// Line of the row in the file, header included.
    pub line: u64,
    /// Account code the row resolved to.
    pub account_id: String,
    /// `None` when applied, otherwise why the row was rejected.
    pub rejected: Option<String>,
    /// Cells that could not be read and were taken as zero.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Outcome of a spreadsheet import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Per-row outcomes in file order.
    pub rows: Vec<ImportedRow>,
}

impl ImportReport {
    /// Number of rows written.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.rows.iter().filter(|r| r.rejected.is_none()).count()
    }

    /// Number of rows rejected by validation.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rows.len() - self.applied()
    }

    /// Number of unreadable cells across all rows.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.rows.iter().map(|r| r.warnings.len()).sum()
    }
}

/// Outcome of rolling an organization's entries back to a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoredSnapshot {
    /// The instant the entries were rolled back to.
    pub as_of: DateTime<Utc>,
    /// Expense values after the restore.
    pub expenses: ExpenseValues,
    /// Revenue values after the restore.
    pub revenues: RevenueValues,
    /// Number of recovery records written.
    pub changes: usize,
}

/// Rows removed by a full data wipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearedData {
    /// Expense rows deleted.
    pub expenses: u64,
    /// Revenue rows deleted.
    pub revenues: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expense_amounts_valid() {
        let amounts = ExpenseAmounts::new(dec!(1000), dec!(100)).unwrap();
        assert_eq!(amounts.apoio(), dec!(900));
        assert!(ExpenseAmounts::new(dec!(0), dec!(0)).is_ok());
        assert!(ExpenseAmounts::new(dec!(50), dec!(50)).is_ok());
    }

    #[test]
    fn test_expense_amounts_rejects_finalistica_over_total() {
        let err = ExpenseAmounts::new(dec!(100), dec!(100.01)).unwrap_err();
        assert!(matches!(err, EntryError::Validation(_)));
    }

    #[test]
    fn test_expense_amounts_rejects_negative() {
        assert!(ExpenseAmounts::new(dec!(-1), dec!(-2)).is_err());
        assert!(ExpenseAmounts::new(dec!(10), dec!(-1)).is_err());
    }

    #[test]
    fn test_revenue_validation() {
        assert!(validate_revenue(dec!(0)).is_ok());
        assert!(validate_revenue(dec!(-0.01)).is_err());
    }

    #[test]
    fn test_amount_limit_is_ten_to_the_sixteenth() {
        assert_eq!(AMOUNT_LIMIT, Decimal::from(10_i64.pow(16)));
    }

    #[rstest]
    #[case(dec!(1234.567))]
    #[case(dec!(0.001))]
    #[case(Decimal::from(10_i64.pow(16)))]
    #[case(Decimal::from_i128_with_scale(9_999_999_999_999_999_999, 2))]
    fn test_amounts_outside_numeric_18_2_are_rejected(#[case] value: Decimal) {
        assert!(matches!(
            ExpenseAmounts::new(value, Decimal::ZERO),
            Err(EntryError::Validation(_))
        ));
        assert!(matches!(
            validate_revenue(value),
            Err(EntryError::Validation(_))
        ));
    }

    #[test]
    fn test_finalistica_with_three_decimals_is_rejected() {
        let err = ExpenseAmounts::new(dec!(10), dec!(1.005)).unwrap_err();
        assert!(err.to_string().contains("finalistica (1.005)"));
    }

    #[rstest]
    #[case(dec!(1234.56))]
    #[case(dec!(12.500))]
    #[case(Decimal::new(999_999_999_999_999_999, 2))]
    fn test_amounts_inside_numeric_18_2_are_accepted(#[case] value: Decimal) {
        assert!(ExpenseAmounts::new(value, Decimal::ZERO).is_ok());
        assert!(validate_revenue(value).is_ok());
    }

    #[test]
    fn test_expense_changes_only_records_changed_fields() {
        let org = OrganizationId::new();
        let user = UserId::new();
        let now = Utc::now();
        let before = ExpenseAmounts::new(dec!(1000), dec!(100)).unwrap();
        let after = ExpenseAmounts::new(dec!(1000), dec!(200)).unwrap();

        let changes = expense_changes(org, "1.1.1.1", Some(before), after, user, now);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, EntryField::Finalistica);
        assert_eq!(changes[0].previous_value, dec!(100));
        assert_eq!(changes[0].new_value, dec!(200));

        let first_write = expense_changes(org, "1.1.1.1", None, after, user, now);
        assert_eq!(first_write.len(), 2);

        assert!(expense_changes(org, "1.1.1.1", Some(after), after, user, now).is_empty());
    }

    #[test]
    fn test_revenue_change() {
        let org = OrganizationId::new();
        let user = UserId::new();
        let now = Utc::now();
        assert!(revenue_change(org, "1.1.1", Some(dec!(5)), dec!(5), user, now).is_none());
        let change = revenue_change(org, "1.1.1", None, dec!(5), user, now).unwrap();
        assert_eq!(change.previous_value, Decimal::ZERO);
        assert_eq!(change.field, EntryField::Value);
    }

    #[test]
    fn test_import_report_counts() {
        let report = ImportReport {
            rows: vec![
                ImportedRow {
                    line: 2,
                    account_id: "1.1.1.1".into(),
                    rejected: None,
                    warnings: vec!["line 2, column 'Total': 'abc' is not a number; read as 0".into()],
                },
                ImportedRow {
                    line: 3,
                    account_id: "1.1.1.2".into(),
                    rejected: Some("finalistica (2) cannot exceed total (1)".into()),
                    warnings: Vec::new(),
                },
            ],
        };
        assert_eq!(report.applied(), 1);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.warnings(), 1);
    }
}
