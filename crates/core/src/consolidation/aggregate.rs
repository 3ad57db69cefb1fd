//! Folding stored rows into per-organization maps.

use std::collections::BTreeMap;

use declara_shared::types::OrganizationId;

use crate::entries::{ExpenseAmounts, ExpenseRow, ExpenseValues, RevenueRow, RevenueValues};

/// Expense values of every organization.
pub type ConsolidatedExpenses = BTreeMap<OrganizationId, ExpenseValues>;

/// Revenue values of every organization.
pub type ConsolidatedRevenues = BTreeMap<OrganizationId, RevenueValues>;

/// Groups expense rows by organization and account.
///
/// The store keeps one row per key, but duplicates are summed rather than
/// overwritten should they ever appear.
#[must_use]
pub fn consolidate_expenses(rows: &[ExpenseRow]) -> ConsolidatedExpenses {
    let mut out = ConsolidatedExpenses::new();
    for row in rows {
        let slot = out
            .entry(row.organization_id)
            .or_default()
            .entry(row.account_id.clone())
            .or_insert(ExpenseAmounts::ZERO);
        slot.total += row.amounts.total;
        slot.finalistica += row.amounts.finalistica;
    }
    out
}

/// Groups revenue rows by organization and account, summing duplicates.
#[must_use]
pub fn consolidate_revenues(rows: &[RevenueRow]) -> ConsolidatedRevenues {
    let mut out = ConsolidatedRevenues::new();
    for row in rows {
        *out.entry(row.organization_id)
            .or_default()
            .entry(row.account_id.clone())
            .or_default() += row.value;
    }
    out
}
