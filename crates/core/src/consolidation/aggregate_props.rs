//! Property-based tests for consolidation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregate::{consolidate_expenses, consolidate_revenues};
use crate::entries::{ExpenseAmounts, ExpenseRow, RevenueRow};
use declara_shared::types::OrganizationId;

fn arb_expense_rows() -> impl Strategy<Value = Vec<ExpenseRow>> {
    let orgs: Vec<OrganizationId> = (0..4).map(|_| OrganizationId::new()).collect();
    let accounts = vec!["1.1.1.1", "1.1.1.2", "1.2.1.1"];
    proptest::collection::vec(
        (
            proptest::sample::select(orgs),
            proptest::sample::select(accounts),
            0i64..1_000_000,
            0i64..1_000_000,
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(org, account, a, b)| ExpenseRow {
                organization_id: org,
                account_id: account.to_string(),
                amounts: ExpenseAmounts {
                    total: Decimal::new(a.max(b), 2),
                    finalistica: Decimal::new(a.min(b), 2),
                },
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Consolidating twice yields the same result.
    #[test]
    fn prop_consolidation_is_deterministic(rows in arb_expense_rows()) {
        prop_assert_eq!(consolidate_expenses(&rows), consolidate_expenses(&rows));
    }

    /// Totals are preserved: nothing is lost or double counted.
    #[test]
    fn prop_totals_are_preserved(rows in arb_expense_rows()) {
        let input: Decimal = rows.iter().map(|r| r.amounts.total).sum();
        let output: Decimal = consolidate_expenses(&rows)
            .values()
            .flat_map(|values| values.values())
            .map(|a| a.total)
            .sum();
        prop_assert_eq!(input, output);
    }

    /// Row order does not matter.
    #[test]
    fn prop_order_independent(rows in arb_expense_rows()) {
        let mut reversed = rows.clone();
        reversed.reverse();
        prop_assert_eq!(consolidate_expenses(&rows), consolidate_expenses(&reversed));
    }

    /// Consolidated amounts keep `finalistica <= total`.
    #[test]
    fn prop_invariant_survives_summing(rows in arb_expense_rows()) {
        for values in consolidate_expenses(&rows).values() {
            for amounts in values.values() {
                prop_assert!(amounts.validate().is_ok());
            }
        }
    }

    /// Revenue sums match the input.
    #[test]
    fn prop_revenue_totals_are_preserved(values in proptest::collection::vec(0i64..1_000_000, 0..30)) {
        let org = OrganizationId::new();
        let rows: Vec<RevenueRow> = values
            .iter()
            .map(|v| RevenueRow {
                organization_id: org,
                account_id: "1.1.1".into(),
                value: Decimal::new(*v, 2),
            })
            .collect();
        let expected: Decimal = rows.iter().map(|r| r.value).sum();
        let actual: Decimal = consolidate_revenues(&rows)
            .values()
            .flat_map(|v| v.values())
            .copied()
            .sum();
        prop_assert_eq!(expected, actual);
    }
}
