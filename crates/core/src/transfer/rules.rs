//! Transfer validation, valuation, and stock movement derivation.

use rust_decimal::Decimal;
use thiserror::Error;
use vendra_shared::types::BranchId;

use super::types::{StockMovement, TransferLine, TransferStatus, TransferTransitionError};

/// Rejected transfer input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferValidationError {
    /// Source and destination must differ.
    #[error("Source and destination branch must be different")]
    SameBranch,

    /// A transfer must move at least one product.
    #[error("Transfer must have at least one line")]
    EmptyLines,

    /// Sent quantity must be strictly positive.
    #[error("Line {index}: sent quantity must be greater than zero, got {quantity}")]
    NonPositiveSentQuantity {
        /// Zero-based line index.
        index: usize,
        /// The offending quantity.
        quantity: Decimal,
    },

    /// Received quantity, when given, must not be negative.
    #[error("Line {index}: received quantity must not be negative, got {quantity}")]
    NegativeReceivedQuantity {
        /// Zero-based line index.
        index: usize,
        /// The offending quantity.
        quantity: Decimal,
    },

    /// Send price must not be negative.
    #[error("Line {index}: send price must not be negative, got {price}")]
    NegativeSendPrice {
        /// Zero-based line index.
        index: usize,
        /// The offending price.
        price: Decimal,
    },
}

/// Validates branch pair and line set of a transfer.
///
/// # Errors
///
/// Returns the first violation: identical branches, empty lines,
/// non-positive sent quantity, negative received quantity, or negative
/// send price.
pub fn validate_lines(
    source: BranchId,
    destination: BranchId,
    lines: &[TransferLine],
) -> Result<(), TransferValidationError> {
    if source == destination {
        return Err(TransferValidationError::SameBranch);
    }
    if lines.is_empty() {
        return Err(TransferValidationError::EmptyLines);
    }

    for (index, line) in lines.iter().enumerate() {
        if line.sent_quantity <= Decimal::ZERO {
            return Err(TransferValidationError::NonPositiveSentQuantity {
                index,
                quantity: line.sent_quantity,
            });
        }
        if let Some(received) = line.received_quantity {
            if received < Decimal::ZERO {
                return Err(TransferValidationError::NegativeReceivedQuantity {
                    index,
                    quantity: received,
                });
            }
        }
        if line.send_price < Decimal::ZERO {
            return Err(TransferValidationError::NegativeSendPrice {
                index,
                price: line.send_price,
            });
        }
    }

    Ok(())
}

/// Total value of a transfer: sum of sent quantity times send price.
#[must_use]
pub fn total_value(lines: &[TransferLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.sent_quantity * line.send_price)
        .sum()
}

/// The inventory movements a commit applies.
///
/// Each line yields a decrement of the sent quantity at the source and an
/// increment of the effective received quantity at the destination.
#[must_use]
pub fn movements(
    source: BranchId,
    destination: BranchId,
    lines: &[TransferLine],
) -> Vec<StockMovement> {
    lines
        .iter()
        .flat_map(|line| {
            [
                StockMovement {
                    branch_id: source,
                    product_id: line.product_id,
                    delta: -line.sent_quantity,
                },
                StockMovement {
                    branch_id: destination,
                    product_id: line.product_id,
                    delta: line.effective_received(),
                },
            ]
        })
        .collect()
}

/// Negates a movement set, for cancelling or re-editing a committed transfer.
#[must_use]
pub fn reverse_movements(applied: &[StockMovement]) -> Vec<StockMovement> {
    applied
        .iter()
        .map(|movement| StockMovement {
            delta: -movement.delta,
            ..*movement
        })
        .collect()
}

/// Validates a transfer status transition.
///
/// Drafts can be committed or cancelled; committed transfers can only be
/// cancelled. Cancelled is terminal.
///
/// # Errors
///
/// Returns [`TransferTransitionError`] for any other move.
pub fn validate_transfer_transition(
    from: TransferStatus,
    to: TransferStatus,
) -> Result<(), TransferTransitionError> {
    let allowed = matches!(
        (from, to),
        (TransferStatus::Draft, TransferStatus::Committed | TransferStatus::Cancelled)
            | (TransferStatus::Committed, TransferStatus::Cancelled)
    );

    if allowed {
        Ok(())
    } else {
        Err(TransferTransitionError { from, to })
    }
}
