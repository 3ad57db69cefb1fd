//! Printable reports: every catalog account with synthetic subtotals.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use declara_shared::types::OrganizationId;
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{ExpenseValues, RevenueValues};
use crate::catalog::{AccountKind, Catalog};

/// One line of a printable report.
///
/// Synthetic lines carry the sum of their analytic descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    /// Account code.
    pub code: &'static str,
    /// Account name.
    pub name: &'static str,
    /// Analytic or synthetic.
    pub kind: AccountKind,
    /// Expense total or revenue value.
    pub total: Decimal,
    /// Expense finalística share; absent on revenue reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalistica: Option<Decimal>,
    /// Expense support share; absent on revenue reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apoio: Option<Decimal>,
}

/// A printable report of one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Organization reported on.
    pub organization_id: OrganizationId,
    /// Reporting year.
    pub period_year: i32,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Every catalog account in catalog order.
    pub lines: Vec<ReportLine>,
    /// Sum of every analytic value.
    pub grand_total: Decimal,
}

/// Report lines of an expense chart.
#[must_use]
pub fn expense_lines(values: &ExpenseValues) -> Vec<ReportLine> {
    let catalog = Catalog::expense();
    let totals: BTreeMap<String, Decimal> =
        values.iter().map(|(code, a)| (code.clone(), a.total)).collect();
    let finalistica: BTreeMap<String, Decimal> = values
        .iter()
        .map(|(code, a)| (code.clone(), a.finalistica))
        .collect();

    catalog
        .accounts()
        .iter()
        .map(|account| {
            let total = catalog.synthetic_total(account.code, &totals);
            let finalistica = catalog.synthetic_total(account.code, &finalistica);
            ReportLine {
                code: account.code,
                name: account.name,
                kind: account.kind,
                total,
                finalistica: Some(finalistica),
                apoio: Some(total - finalistica),
            }
        })
        .collect()
}

/// Report lines of a revenue chart.
#[must_use]
pub fn revenue_lines(values: &RevenueValues) -> Vec<ReportLine> {
    let catalog = Catalog::revenue();
    catalog
        .accounts()
        .iter()
        .map(|account| ReportLine {
            code: account.code,
            name: account.name,
            kind: account.kind,
            total: catalog.synthetic_total(account.code, values),
            finalistica: None,
            apoio: None,
        })
        .collect()
}

/// Sum of the analytic lines.
#[must_use]
pub fn grand_total(lines: &[ReportLine]) -> Decimal {
    lines
        .iter()
        .filter(|l| l.kind == AccountKind::Analytic)
        .map(|l| l.total)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::ExpenseAmounts;
    use rust_decimal_macros::dec;

    fn line<'a>(lines: &'a [ReportLine], code: &str) -> &'a ReportLine {
        lines.iter().find(|l| l.code == code).unwrap()
    }

    #[test]
    fn test_expense_lines_roll_up_into_synthetic_accounts() {
        let mut values = ExpenseValues::new();
        values.insert("1.1.1.1".into(), ExpenseAmounts::new(dec!(1000), dec!(100)).unwrap());
        values.insert("1.1.1.2".into(), ExpenseAmounts::new(dec!(500), dec!(500)).unwrap());
        values.insert("1.1.2.1".into(), ExpenseAmounts::new(dec!(200), dec!(0)).unwrap());

        let lines = expense_lines(&values);
        assert_eq!(lines.len(), Catalog::expense().accounts().len());

        let remuneracao = line(&lines, "1.1.1");
        assert_eq!(remuneracao.kind, AccountKind::Synthetic);
        assert_eq!(remuneracao.total, dec!(1500));
        assert_eq!(remuneracao.finalistica, Some(dec!(600)));
        assert_eq!(remuneracao.apoio, Some(dec!(900)));

        assert_eq!(line(&lines, "1.1").total, dec!(1700));
        assert_eq!(line(&lines, "1.1.1.3").total, Decimal::ZERO);
        assert_eq!(grand_total(&lines), dec!(1700));
    }

    #[test]
    fn test_revenue_lines_have_no_expense_shares() {
        let analytic: Vec<_> = Catalog::revenue().analytic().take(2).collect();
        let mut values = RevenueValues::new();
        values.insert(analytic[0].code.to_string(), dec!(70));
        values.insert(analytic[1].code.to_string(), dec!(30));

        let lines = revenue_lines(&values);
        assert!(lines.iter().all(|l| l.finalistica.is_none() && l.apoio.is_none()));
        assert_eq!(line(&lines, analytic[0].code).total, dec!(70));
        assert_eq!(grand_total(&lines), dec!(100));
    }
}
