//! Wide BI tables.

use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregate::{ConsolidatedExpenses, ConsolidatedRevenues};
use crate::catalog::Catalog;
use crate::organization::Organization;

const ORGANIZATION_HEADER: &str = "Organização";

/// A BI table: one row per organization, one column per account measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BiTable {
    /// Column headers, starting with the organization column.
    pub headers: Vec<String>,
    /// Data rows.
    pub rows: Vec<BiRow>,
}

/// One organization's row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BiRow {
    /// Organization name.
    pub organization: String,
    /// Values aligned with `headers[1..]`.
    pub values: Vec<Decimal>,
}

/// Expense table with a finalística and an apoio column per analytic account.
#[must_use]
pub fn bi_expense_table(
    consolidated: &ConsolidatedExpenses,
    organizations: &[Organization],
) -> BiTable {
    let accounts: Vec<_> = Catalog::expense().analytic().collect();

    let mut headers = Vec::with_capacity(accounts.len() * 2 + 1);
    headers.push(ORGANIZATION_HEADER.to_string());
    for account in &accounts {
        headers.push(format!("{} - {} - Finalística", account.code, account.name));
        headers.push(format!("{} - {} - Apoio", account.code, account.name));
    }

    let rows = organizations
        .iter()
        .map(|org| {
            let values = consolidated.get(&org.id);
            BiRow {
                organization: org.name.clone(),
                values: accounts
                    .iter()
                    .flat_map(|account| {
                        let amounts = values
                            .and_then(|v| v.get(account.code))
                            .copied()
                            .unwrap_or_default();
                        [amounts.finalistica, amounts.apoio()]
                    })
                    .collect(),
            }
        })
        .collect();

    BiTable { headers, rows }
}

/// Revenue table with one column per analytic account.
#[must_use]
pub fn bi_revenue_table(
    consolidated: &ConsolidatedRevenues,
    organizations: &[Organization],
) -> BiTable {
    let accounts: Vec<_> = Catalog::revenue().analytic().collect();

    let mut headers = Vec::with_capacity(accounts.len() + 1);
    headers.push(ORGANIZATION_HEADER.to_string());
    headers.extend(
        accounts
            .iter()
            .map(|account| format!("{} - {}", account.code, account.name)),
    );

    let rows = organizations
        .iter()
        .map(|org| {
            let values = consolidated.get(&org.id);
            BiRow {
                organization: org.name.clone(),
                values: accounts
                    .iter()
                    .map(|account| {
                        values
                            .and_then(|v| v.get(account.code))
                            .copied()
                            .unwrap_or_default()
                    })
                    .collect(),
            }
        })
        .collect();

    BiTable { headers, rows }
}
