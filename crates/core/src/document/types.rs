//! Document enums shared across the core and persistence layers.

use serde::{Deserialize, Serialize};

/// The kind of commercial document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Customer sales order.
    SalesOrder,
    /// Customer invoice.
    Invoice,
    /// Supplier purchase order.
    PurchaseOrder,
}

impl DocumentKind {
    /// Two-letter prefix used in generated document codes.
    #[must_use]
    pub const fn code_prefix(self) -> &'static str {
        match self {
            Self::SalesOrder => "SO",
            Self::Invoice => "IN",
            Self::PurchaseOrder => "PO",
        }
    }

    /// Whether this kind sells to a customer (as opposed to buying from a
    /// supplier). Sales kinds resolve prices and accept payments.
    #[must_use]
    pub const fn is_sales(self) -> bool {
        matches!(self, Self::SalesOrder | Self::Invoice)
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SalesOrder => "sales_order",
            Self::Invoice => "invoice",
            Self::PurchaseOrder => "purchase_order",
        }
    }
}

/// Document lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Created and editable; not yet fulfilled.
    Open,
    /// Fulfilled; stock effects applied.
    Completed,
    /// Voided; excluded from balances.
    Cancelled,
    /// Sales-only holding state for undelivered goods.
    NotDelivered,
}

impl DocumentStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NotDelivered => "not_delivered",
        }
    }
}

/// Derived payment status. Never stored; always recomputed from amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No payment recorded.
    Unpaid,
    /// Some, but not all, of the grand total is paid.
    Partial,
    /// Paid in full (or overpaid).
    Paid,
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Card payment.
    Card,
    /// Anything else.
    Other,
}

impl PaymentMethod {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::Card => "card",
            Self::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_prefixes() {
        assert_eq!(DocumentKind::SalesOrder.code_prefix(), "SO");
        assert_eq!(DocumentKind::Invoice.code_prefix(), "IN");
        assert_eq!(DocumentKind::PurchaseOrder.code_prefix(), "PO");
    }

    #[test]
    fn test_sales_kinds() {
        assert!(DocumentKind::SalesOrder.is_sales());
        assert!(DocumentKind::Invoice.is_sales());
        assert!(!DocumentKind::PurchaseOrder.is_sales());
    }

    #[test]
    fn test_serde_representation_matches_storage() {
        let json = serde_json::to_string(&DocumentStatus::NotDelivered).unwrap();
        assert_eq!(json, "\"not_delivered\"");
        assert_eq!(DocumentStatus::NotDelivered.as_str(), "not_delivered");
    }
}
