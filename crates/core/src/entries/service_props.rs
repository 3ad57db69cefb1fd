//! Property-based tests for entry validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::{ExpenseAmounts, validate_revenue};

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000_00i64..1_000_000_00i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Accepted expense figures always satisfy 0 <= finalistica <= total.
    #[test]
    fn prop_accepted_expenses_hold_invariant(total in arb_amount(), finalistica in arb_amount()) {
        match ExpenseAmounts::new(total, finalistica) {
            Ok(amounts) => {
                prop_assert!(amounts.finalistica >= Decimal::ZERO);
                prop_assert!(amounts.finalistica <= amounts.total);
                prop_assert!(amounts.apoio() >= Decimal::ZERO);
                prop_assert_eq!(amounts.apoio() + amounts.finalistica, amounts.total);
            }
            Err(_) => {
                let valid = total >= Decimal::ZERO
                    && finalistica >= Decimal::ZERO
                    && finalistica <= total;
                prop_assert!(!valid);
            }
        }
    }

    /// Revenue values are accepted iff non-negative.
    #[test]
    fn prop_revenue_validation(value in arb_amount()) {
        prop_assert_eq!(validate_revenue(value).is_ok(), value >= Decimal::ZERO);
    }
}
