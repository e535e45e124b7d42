//! Property-based tests for total arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::totals::{debt_amount, document_totals, line_total, payment_status, LineAmounts};
use super::types::PaymentStatus;

/// Money-like amounts with two fraction digits.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Quantities with up to three fraction digits.
fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|millis| Decimal::new(millis, 3))
}

/// Percentage ratio in 0..=100 with two fraction digits.
fn ratio() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|basis| Decimal::new(basis, 2))
}

fn undiscounted_line() -> impl Strategy<Value = LineAmounts> {
    (quantity(), amount()).prop_map(|(quantity, unit_price)| LineAmounts {
        quantity,
        unit_price,
        discount_amount: Decimal::ZERO,
        discount_ratio: Decimal::ZERO,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Without discounts the line total is exactly quantity times price.
    #[test]
    fn prop_undiscounted_line_is_gross(line in undiscounted_line()) {
        prop_assert_eq!(line_total(&line), line.quantity * line.unit_price);
    }

    /// Discounts never increase a line total.
    #[test]
    fn prop_discounts_never_increase_total(
        line in undiscounted_line(),
        disc in amount(),
        r in ratio(),
    ) {
        let discounted = LineAmounts {
            discount_amount: disc,
            discount_ratio: r,
            ..line
        };
        prop_assert!(line_total(&discounted) <= line_total(&line));
    }

    /// The grand total identity holds for any line set and document discount.
    #[test]
    fn prop_grand_total_identity(
        totals in prop::collection::vec(amount(), 0..20),
        disc in amount(),
        r in ratio(),
    ) {
        let doc = document_totals(&totals, disc, r);
        prop_assert_eq!(doc.grand_total, doc.subtotal - doc.discount_total);
    }

    /// Debt is never negative and never exceeds the grand total for
    /// non-negative inputs.
    #[test]
    fn prop_debt_bounds(grand in amount(), paid in amount()) {
        let debt = debt_amount(grand, paid);
        prop_assert!(debt >= Decimal::ZERO);
        prop_assert!(debt <= grand);
    }

    /// Payment status agrees with the debt calculation.
    #[test]
    fn prop_payment_status_consistent_with_debt(grand in amount(), paid in amount()) {
        let debt = debt_amount(grand, paid);
        match payment_status(grand, paid) {
            PaymentStatus::Paid => prop_assert_eq!(debt, Decimal::ZERO),
            PaymentStatus::Partial => {
                prop_assert!(paid > Decimal::ZERO);
                prop_assert!(debt > Decimal::ZERO);
            }
            PaymentStatus::Unpaid => prop_assert_eq!(paid, Decimal::ZERO),
        }
    }
}
