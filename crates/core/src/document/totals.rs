//! Line and document total arithmetic.
//!
//! All functions are pure over `Decimal`. The line formula may produce a
//! negative total when discounts exceed the gross amount; callers reject
//! that via [`super::validation::validate_lines`], the calculator itself
//! never clamps.

use rust_decimal::Decimal;

use super::types::PaymentStatus;

/// The raw amounts of one line before totalling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    /// Quantity sold or bought.
    pub quantity: Decimal,
    /// Unit price after price resolution.
    pub unit_price: Decimal,
    /// Flat discount on the line.
    pub discount_amount: Decimal,
    /// Percentage discount on the line, 0..=100.
    pub discount_ratio: Decimal,
}

/// Document-level totals derived from lines and document discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentTotals {
    /// Sum of all line totals.
    pub subtotal: Decimal,
    /// Document flat discount plus ratio discount over the subtotal.
    pub discount_total: Decimal,
    /// `subtotal - discount_total`.
    pub grand_total: Decimal,
}

/// `quantity * unit_price - discount_amount - quantity * unit_price * ratio / 100`.
#[must_use]
pub fn line_total(line: &LineAmounts) -> Decimal {
    let gross = line.quantity * line.unit_price;
    gross - line.discount_amount - gross * line.discount_ratio / Decimal::ONE_HUNDRED
}

/// Folds line totals and document discounts into [`DocumentTotals`].
#[must_use]
pub fn document_totals(
    line_totals: &[Decimal],
    discount_amount: Decimal,
    discount_ratio: Decimal,
) -> DocumentTotals {
    let subtotal: Decimal = line_totals.iter().copied().sum();
    let discount_total = discount_amount + subtotal * discount_ratio / Decimal::ONE_HUNDRED;
    DocumentTotals {
        subtotal,
        discount_total,
        grand_total: subtotal - discount_total,
    }
}

/// `max(0, grand_total - paid)`. Overpayment never produces negative debt.
#[must_use]
pub fn debt_amount(grand_total: Decimal, paid: Decimal) -> Decimal {
    (grand_total - paid).max(Decimal::ZERO)
}

/// Derives payment status from the amounts. A zero-total document with no
/// payment counts as unpaid, not paid.
#[must_use]
pub fn payment_status(grand_total: Decimal, paid: Decimal) -> PaymentStatus {
    if paid > Decimal::ZERO && paid >= grand_total {
        PaymentStatus::Paid
    } else if paid > Decimal::ZERO {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Unpaid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(qty: Decimal, price: Decimal, disc: Decimal, ratio: Decimal) -> LineAmounts {
        LineAmounts {
            quantity: qty,
            unit_price: price,
            discount_amount: disc,
            discount_ratio: ratio,
        }
    }

    #[test]
    fn test_line_total_plain() {
        let total = line_total(&line(dec!(3), dec!(100), dec!(0), dec!(0)));
        assert_eq!(total, dec!(300));
    }

    #[test]
    fn test_line_total_with_both_discounts() {
        // 2 * 50 = 100, minus 5 flat, minus 10% of 100.
        let total = line_total(&line(dec!(2), dec!(50), dec!(5), dec!(10)));
        assert_eq!(total, dec!(85));
    }

    #[test]
    fn test_line_total_may_go_negative() {
        let total = line_total(&line(dec!(1), dec!(10), dec!(20), dec!(0)));
        assert_eq!(total, dec!(-10));
    }

    #[test]
    fn test_fractional_quantity() {
        let total = line_total(&line(dec!(1.5), dec!(10), dec!(0), dec!(0)));
        assert_eq!(total, dec!(15.0));
    }

    #[test]
    fn test_document_totals_combines_discounts() {
        // subtotal 200, flat 10, ratio 5% of 200 = 10, grand 180.
        let totals = document_totals(&[dec!(120), dec!(80)], dec!(10), dec!(5));
        assert_eq!(totals.subtotal, dec!(200));
        assert_eq!(totals.discount_total, dec!(20.00));
        assert_eq!(totals.grand_total, dec!(180.00));
    }

    #[test]
    fn test_document_totals_empty_lines() {
        let totals = document_totals(&[], dec!(0), dec!(0));
        assert_eq!(totals.subtotal, dec!(0));
        assert_eq!(totals.grand_total, dec!(0));
    }

    #[test]
    fn test_debt_clamps_at_zero() {
        assert_eq!(debt_amount(dec!(100), dec!(40)), dec!(60));
        assert_eq!(debt_amount(dec!(100), dec!(150)), dec!(0));
    }

    #[test]
    fn test_payment_status_transitions() {
        assert_eq!(payment_status(dec!(100), dec!(0)), PaymentStatus::Unpaid);
        assert_eq!(payment_status(dec!(100), dec!(40)), PaymentStatus::Partial);
        assert_eq!(payment_status(dec!(100), dec!(100)), PaymentStatus::Paid);
        assert_eq!(payment_status(dec!(100), dec!(120)), PaymentStatus::Paid);
    }

    #[test]
    fn test_zero_total_document_is_unpaid_until_any_payment() {
        assert_eq!(payment_status(dec!(0), dec!(0)), PaymentStatus::Unpaid);
        assert_eq!(payment_status(dec!(0), dec!(1)), PaymentStatus::Paid);
    }
}
