//! Input validation for document creation and full-line-replace updates.

use rust_decimal::Decimal;
use thiserror::Error;

use super::totals::{line_total, LineAmounts};

/// Rejected document input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentValidationError {
    /// A document must carry at least one line.
    #[error("Document must have at least one line item")]
    EmptyLines,

    /// Quantity must be strictly positive.
    #[error("Line {index}: quantity must be greater than zero, got {quantity}")]
    NonPositiveQuantity {
        /// Zero-based line index.
        index: usize,
        /// The offending quantity.
        quantity: Decimal,
    },

    /// Unit price must not be negative.
    #[error("Line {index}: unit price must not be negative, got {unit_price}")]
    NegativeUnitPrice {
        /// Zero-based line index.
        index: usize,
        /// The offending unit price.
        unit_price: Decimal,
    },

    /// Discount ratios are percentages.
    #[error("Discount ratio must be between 0 and 100, got {ratio}")]
    DiscountRatioOutOfRange {
        /// The offending ratio.
        ratio: Decimal,
    },

    /// Discounts larger than the gross line amount are rejected for every
    /// document kind.
    #[error("Line {index}: discounts exceed the line amount (total {total})")]
    NegativeLineTotal {
        /// Zero-based line index.
        index: usize,
        /// The computed negative total.
        total: Decimal,
    },
}

/// Validates a percentage ratio field (line or document level).
///
/// # Errors
///
/// Returns [`DocumentValidationError::DiscountRatioOutOfRange`] when the
/// ratio falls outside `0..=100`.
pub fn validate_discount_ratio(ratio: Decimal) -> Result<(), DocumentValidationError> {
    if ratio < Decimal::ZERO || ratio > Decimal::ONE_HUNDRED {
        return Err(DocumentValidationError::DiscountRatioOutOfRange { ratio });
    }
    Ok(())
}

/// Validates the full line set of a document.
///
/// # Errors
///
/// Returns the first violation found: empty line set, non-positive quantity,
/// negative unit price, out-of-range discount ratio, or a line whose computed
/// total is negative.
pub fn validate_lines(lines: &[LineAmounts]) -> Result<(), DocumentValidationError> {
    if lines.is_empty() {
        return Err(DocumentValidationError::EmptyLines);
    }

    for (index, line) in lines.iter().enumerate() {
        if line.quantity <= Decimal::ZERO {
            return Err(DocumentValidationError::NonPositiveQuantity {
                index,
                quantity: line.quantity,
            });
        }
        if line.unit_price < Decimal::ZERO {
            return Err(DocumentValidationError::NegativeUnitPrice {
                index,
                unit_price: line.unit_price,
            });
        }
        validate_discount_ratio(line.discount_ratio)?;

        let total = line_total(line);
        if total < Decimal::ZERO {
            return Err(DocumentValidationError::NegativeLineTotal { index, total });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ok_line() -> LineAmounts {
        LineAmounts {
            quantity: dec!(2),
            unit_price: dec!(50),
            discount_amount: dec!(0),
            discount_ratio: dec!(0),
        }
    }

    #[test]
    fn test_empty_lines_rejected() {
        assert_eq!(
            validate_lines(&[]),
            Err(DocumentValidationError::EmptyLines)
        );
    }

    #[test]
    fn test_valid_lines_pass() {
        assert!(validate_lines(&[ok_line(), ok_line()]).is_ok());
    }

    #[test]
    fn test_zero_quantity_rejected_with_index() {
        let mut bad = ok_line();
        bad.quantity = dec!(0);
        let err = validate_lines(&[ok_line(), bad]).unwrap_err();
        assert_eq!(
            err,
            DocumentValidationError::NonPositiveQuantity {
                index: 1,
                quantity: dec!(0),
            }
        );
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut bad = ok_line();
        bad.unit_price = dec!(-1);
        assert!(matches!(
            validate_lines(&[bad]),
            Err(DocumentValidationError::NegativeUnitPrice { index: 0, .. })
        ));
    }

    #[test]
    fn test_ratio_bounds() {
        assert!(validate_discount_ratio(dec!(0)).is_ok());
        assert!(validate_discount_ratio(dec!(100)).is_ok());
        assert!(validate_discount_ratio(dec!(100.01)).is_err());
        assert!(validate_discount_ratio(dec!(-0.01)).is_err());
    }

    #[test]
    fn test_excessive_flat_discount_rejected() {
        let mut bad = ok_line();
        bad.discount_amount = dec!(200);
        let err = validate_lines(&[bad]).unwrap_err();
        assert!(matches!(
            err,
            DocumentValidationError::NegativeLineTotal { index: 0, .. }
        ));
        assert!(err.to_string().contains("-100"));
    }

    #[test]
    fn test_full_ratio_discount_is_allowed() {
        // 100% ratio yields a zero line total, which is not negative.
        let mut line = ok_line();
        line.discount_ratio = dec!(100);
        assert!(validate_lines(&[line]).is_ok());
    }
}
