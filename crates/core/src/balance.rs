//! Counterparty balance aggregation.
//!
//! Balances are always recomputed from scratch over the counterparty's
//! non-cancelled documents, never patched incrementally. The repository
//! loads the document rows and folds them here.

use rust_decimal::Decimal;

use crate::document::DocumentStatus;

/// The two derived fields written back to the counterparty row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterpartyBalance {
    /// Sum of `grand_total` over non-cancelled documents.
    pub total_purchased: Decimal,
    /// Sum of `debt_amount` over the same set.
    pub total_debt: Decimal,
}

/// One document's contribution to a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSource {
    /// Document status; cancelled documents contribute nothing.
    pub status: DocumentStatus,
    /// The document's grand total.
    pub grand_total: Decimal,
    /// The document's outstanding debt.
    pub debt_amount: Decimal,
}

/// Folds documents into a balance, skipping cancelled ones.
#[must_use]
pub fn aggregate_balance(documents: &[BalanceSource]) -> CounterpartyBalance {
    documents
        .iter()
        .filter(|doc| doc.status != DocumentStatus::Cancelled)
        .fold(CounterpartyBalance::default(), |acc, doc| {
            CounterpartyBalance {
                total_purchased: acc.total_purchased + doc.grand_total,
                total_debt: acc.total_debt + doc.debt_amount,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn doc(status: DocumentStatus, grand: Decimal, debt: Decimal) -> BalanceSource {
        BalanceSource {
            status,
            grand_total: grand,
            debt_amount: debt,
        }
    }

    #[test]
    fn test_empty_set_yields_zero_balance() {
        assert_eq!(aggregate_balance(&[]), CounterpartyBalance::default());
    }

    #[test]
    fn test_sums_non_cancelled_documents() {
        let balance = aggregate_balance(&[
            doc(DocumentStatus::Open, dec!(300), dec!(300)),
            doc(DocumentStatus::Completed, dec!(150), dec!(50)),
            doc(DocumentStatus::NotDelivered, dec!(75), dec!(75)),
        ]);
        assert_eq!(balance.total_purchased, dec!(525));
        assert_eq!(balance.total_debt, dec!(425));
    }

    #[test]
    fn test_cancelled_documents_are_excluded() {
        let balance = aggregate_balance(&[
            doc(DocumentStatus::Open, dec!(100), dec!(100)),
            doc(DocumentStatus::Cancelled, dec!(900), dec!(900)),
        ]);
        assert_eq!(balance.total_purchased, dec!(100));
        assert_eq!(balance.total_debt, dec!(100));
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let docs = [
            doc(DocumentStatus::Open, dec!(10), dec!(10)),
            doc(DocumentStatus::Completed, dec!(20), dec!(0)),
        ];
        assert_eq!(aggregate_balance(&docs), aggregate_balance(&docs));
    }
}
