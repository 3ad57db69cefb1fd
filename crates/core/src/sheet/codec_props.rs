//! Property-based tests for the spreadsheet codec.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::codec::{export_expenses, import_expenses, parse_amount};
use crate::catalog::Catalog;
use crate::entries::{ExpenseAmounts, ExpenseValues};

fn arb_amounts() -> impl Strategy<Value = ExpenseAmounts> {
    (0i64..10_000_000_00, 0u32..=100, any::<bool>()).prop_map(|(total_cents, share, padded)| {
        // Padded totals carry a trailing zero at scale 3, e.g. `12.340`.
        let total = if padded {
            Decimal::new(total_cents * 10, 3)
        } else {
            Decimal::new(total_cents, 2)
        };
        let finalistica = (total * Decimal::from(share) / Decimal::ONE_HUNDRED).round_dp(2);
        ExpenseAmounts { total, finalistica }
    })
}

fn arb_values() -> impl Strategy<Value = ExpenseValues> {
    let codes: Vec<String> = Catalog::expense()
        .analytic()
        .map(|a| a.code.to_string())
        .collect();
    proptest::collection::btree_map(proptest::sample::select(codes), arb_amounts(), 0..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Export then import reproduces every entry; untouched accounts read as zero.
    #[test]
    fn prop_export_import_round_trip(values in arb_values()) {
        let bytes = export_expenses(&values).unwrap();
        let rows = import_expenses(&bytes).unwrap();
        prop_assert!(rows.iter().all(|r| r.issues.is_empty()));
        let imported: ExpenseValues = rows.into_iter().map(|r| (r.account_id, r.value)).collect();

        prop_assert_eq!(imported.len(), Catalog::expense().analytic().count());
        for (code, amounts) in &imported {
            let expected = values.get(code).copied().unwrap_or_default();
            prop_assert_eq!(*amounts, expected);
        }
    }

    /// Any cell text yields a value or an error, never a panic.
    #[test]
    fn prop_parse_amount_never_panics(cell in ".*") {
        let _ = parse_amount(&cell);
    }
}
