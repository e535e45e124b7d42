//! Transfer domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vendra_shared::types::{BranchId, ProductId};

/// Transfer lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Recorded but not applied to inventory.
    Draft,
    /// Applied to inventory at both branches.
    Committed,
    /// Voided; committed movements reversed.
    Cancelled,
}

impl TransferStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Committed => "committed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A transfer status transition the rules do not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot transition a transfer from {from:?} to {to:?}")]
pub struct TransferTransitionError {
    /// Current status.
    pub from: TransferStatus,
    /// Requested status.
    pub to: TransferStatus,
}

/// One line of a transfer, after snapshotting.
///
/// The received quantity may differ from the sent quantity (shrinkage,
/// damage in transit); when absent it defaults to the sent quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLine {
    /// Product being moved.
    pub product_id: ProductId,
    /// Quantity leaving the source branch.
    pub sent_quantity: Decimal,
    /// Quantity arriving at the destination branch, if it differs.
    pub received_quantity: Option<Decimal>,
    /// Unit value used for the transfer's total value.
    pub send_price: Decimal,
}

impl TransferLine {
    /// The quantity booked at the destination.
    #[must_use]
    pub fn effective_received(&self) -> Decimal {
        self.received_quantity.unwrap_or(self.sent_quantity)
    }
}

/// A single inventory adjustment produced by committing or reversing a
/// transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockMovement {
    /// Branch whose inventory changes.
    pub branch_id: BranchId,
    /// Product affected.
    pub product_id: ProductId,
    /// Signed quantity change.
    pub delta: Decimal,
}
