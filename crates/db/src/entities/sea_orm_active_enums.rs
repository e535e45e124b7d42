//! String-backed active enums, portable across PostgreSQL and SQLite.
//!
//! Each enum converts to and from its `vendra-core` counterpart so that
//! repositories can hand rows to the pure rule functions without string
//! juggling.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use vendra_core::document::{DocumentKind, DocumentStatus, PaymentMethod};
use vendra_core::transfer::TransferStatus;

/// Stored document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum DocKind {
    #[sea_orm(string_value = "sales_order")]
    SalesOrder,
    #[sea_orm(string_value = "invoice")]
    Invoice,
    #[sea_orm(string_value = "purchase_order")]
    PurchaseOrder,
}

impl From<DocumentKind> for DocKind {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::SalesOrder => Self::SalesOrder,
            DocumentKind::Invoice => Self::Invoice,
            DocumentKind::PurchaseOrder => Self::PurchaseOrder,
        }
    }
}

impl From<DocKind> for DocumentKind {
    fn from(kind: DocKind) -> Self {
        match kind {
            DocKind::SalesOrder => Self::SalesOrder,
            DocKind::Invoice => Self::Invoice,
            DocKind::PurchaseOrder => Self::PurchaseOrder,
        }
    }
}

/// Stored document status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum DocStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "not_delivered")]
    NotDelivered,
}

impl From<DocumentStatus> for DocStatus {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Open => Self::Open,
            DocumentStatus::Completed => Self::Completed,
            DocumentStatus::Cancelled => Self::Cancelled,
            DocumentStatus::NotDelivered => Self::NotDelivered,
        }
    }
}

impl From<DocStatus> for DocumentStatus {
    fn from(status: DocStatus) -> Self {
        match status {
            DocStatus::Open => Self::Open,
            DocStatus::Completed => Self::Completed,
            DocStatus::Cancelled => Self::Cancelled,
            DocStatus::NotDelivered => Self::NotDelivered,
        }
    }
}

/// Stored payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PayMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "other")]
    Other,
}

impl From<PaymentMethod> for PayMethod {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::BankTransfer => Self::BankTransfer,
            PaymentMethod::Card => Self::Card,
            PaymentMethod::Other => Self::Other,
        }
    }
}

impl From<PayMethod> for PaymentMethod {
    fn from(method: PayMethod) -> Self {
        match method {
            PayMethod::Cash => Self::Cash,
            PayMethod::BankTransfer => Self::BankTransfer,
            PayMethod::Card => Self::Card,
            PayMethod::Other => Self::Other,
        }
    }
}

/// Stored transfer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TransStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "committed")]
    Committed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<TransferStatus> for TransStatus {
    fn from(status: TransferStatus) -> Self {
        match status {
            TransferStatus::Draft => Self::Draft,
            TransferStatus::Committed => Self::Committed,
            TransferStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<TransStatus> for TransferStatus {
    fn from(status: TransStatus) -> Self {
        match status {
            TransStatus::Draft => Self::Draft,
            TransStatus::Committed => Self::Committed,
            TransStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Which side of the trade a counterparty sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum CounterpartyKind {
    #[sea_orm(string_value = "customer")]
    Customer,
    #[sea_orm(string_value = "supplier")]
    Supplier,
}
