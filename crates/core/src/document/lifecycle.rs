//! Status transition rules and stock effects per document kind.

use thiserror::Error;

use super::types::{DocumentKind, DocumentStatus};

/// Which way a stock-affecting document moves inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    /// Goods leave the branch (sales).
    Decrement,
    /// Goods arrive at the branch (purchasing).
    Increment,
}

/// A transition the matrix does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot transition a {kind:?} from {from:?} to {to:?}")]
pub struct TransitionError {
    /// Document kind the transition was attempted on.
    pub kind: DocumentKind,
    /// Current status.
    pub from: DocumentStatus,
    /// Requested status.
    pub to: DocumentStatus,
}

/// Returns the inventory effect a document in `status` has, if any.
///
/// Sales documents move stock only once completed. Purchase orders book
/// incoming stock as soon as they are open and keep it while completed.
/// Cancelled and not-delivered documents never hold stock.
#[must_use]
pub fn stock_effect(kind: DocumentKind, status: DocumentStatus) -> Option<StockDirection> {
    match (kind, status) {
        (DocumentKind::SalesOrder | DocumentKind::Invoice, DocumentStatus::Completed) => {
            Some(StockDirection::Decrement)
        }
        (DocumentKind::PurchaseOrder, DocumentStatus::Open | DocumentStatus::Completed) => {
            Some(StockDirection::Increment)
        }
        _ => None,
    }
}

/// Validates a status transition against the per-kind matrix.
///
/// Completed is deliberately not terminal: completed documents can be
/// reopened for correction or cancelled outright. Purchase orders have no
/// not-delivered state.
///
/// # Errors
///
/// Returns [`TransitionError`] when the matrix forbids the move, including
/// any transition into a status equal to the current one.
pub fn validate_transition(
    kind: DocumentKind,
    from: DocumentStatus,
    to: DocumentStatus,
) -> Result<(), TransitionError> {
    use DocumentStatus::{Cancelled, Completed, NotDelivered, Open};

    let allowed = match (from, to) {
        (Open, Completed | Cancelled) => true,
        (Open, NotDelivered) => kind.is_sales(),
        (NotDelivered, Open | Completed | Cancelled) => kind.is_sales(),
        (Completed, Open | Cancelled) => true,
        (Cancelled, Open) => true,
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(TransitionError { kind, from, to })
    }
}
