//! Transfer ledger: inter-branch stock movements.
//!
//! Stock moves only when a transfer is committed. Editing or removing a
//! committed transfer reverses the applied movement before the new state is
//! applied, mirroring the document ledger's reverse-then-reapply handling.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use vendra_core::sequence::transfer_code;
use vendra_core::transfer::{
    movements, reverse_movements, total_value, validate_lines, validate_transfer_transition,
    StockMovement, TransferLine, TransferStatus, TransferTransitionError, TransferValidationError,
};
use vendra_shared::types::{BranchId, ProductId, TransferId, UserId};
use vendra_shared::AppError;

use crate::entities::{transfer_details, transfers};

use super::catalog::{self, CatalogError};
use super::inventory::{self, InventoryError};
use super::sequence::{self, SequenceError};
use super::{with_conflict_retry, ConflictCheck, DEFAULT_CONFLICT_RETRIES};

/// Error types for transfer operations.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Transfer not found.
    #[error("Transfer not found: {0}")]
    NotFound(Uuid),

    /// Referenced catalog record missing.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Rejected input.
    #[error(transparent)]
    Validation(#[from] TransferValidationError),

    /// Status transition not allowed.
    #[error(transparent)]
    Transition(#[from] TransferTransitionError),

    /// Cancelled transfers cannot be edited.
    #[error("Transfer {0} is cancelled and cannot be edited")]
    EditCancelled(Uuid),

    /// Inventory adjustment failure.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Sequence allocation failure.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ConflictCheck for TransferError {
    fn is_conflict(&self) -> bool {
        match self {
            Self::Inventory(err) => err.is_conflict(),
            Self::Sequence(err) => err.is_conflict(),
            _ => false,
        }
    }
}

impl From<TransferError> for AppError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::NotFound(_) => Self::NotFound(err.to_string()),
            TransferError::Validation(_) => Self::Validation(err.to_string()),
            TransferError::Transition(_) | TransferError::EditCancelled(_) => {
                Self::BusinessRule(err.to_string())
            }
            TransferError::Catalog(inner) => inner.into(),
            TransferError::Inventory(inner) => inner.into(),
            TransferError::Sequence(inner) => inner.into(),
            TransferError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// One requested line of a transfer.
#[derive(Debug, Clone)]
pub struct TransferLineInput {
    /// The product to move.
    pub product_id: ProductId,
    /// Quantity leaving the source, strictly positive.
    pub quantity_sent: Decimal,
    /// Quantity arriving at the destination; defaults to the sent quantity.
    pub quantity_received: Option<Decimal>,
    /// Unit value for the transfer total; defaults to the catalog base price.
    pub send_price: Option<Decimal>,
    /// Booking price at the destination; defaults to the send price.
    pub receive_price: Option<Decimal>,
}

/// Input for creating a transfer.
#[derive(Debug, Clone)]
pub struct CreateTransferInput {
    /// Branch goods leave from.
    pub source_branch_id: BranchId,
    /// Branch goods arrive at.
    pub dest_branch_id: BranchId,
    /// Acting user.
    pub created_by: UserId,
    /// Transfer date, used for the code sequence.
    pub transfer_date: NaiveDate,
    /// Create as draft or commit (and move stock) immediately.
    pub commit: bool,
    /// The lines, at least one.
    pub lines: Vec<TransferLineInput>,
}

/// Input for a full-replace update of an existing transfer.
#[derive(Debug, Clone)]
pub struct UpdateTransferInput {
    /// New transfer date.
    pub transfer_date: NaiveDate,
    /// The full replacement line set.
    pub lines: Vec<TransferLineInput>,
}

/// A transfer with its detail lines.
#[derive(Debug, Clone)]
pub struct TransferWithDetails {
    /// The transfer header.
    pub transfer: transfers::Model,
    /// Detail lines.
    pub details: Vec<transfer_details::Model>,
}

/// A detail line ready for insertion.
struct PreparedDetail {
    product_id: Uuid,
    product_code: String,
    product_name: String,
    quantity_sent: Decimal,
    quantity_received: Decimal,
    send_price: Decimal,
    receive_price: Decimal,
}

impl PreparedDetail {
    fn as_core_line(&self) -> TransferLine {
        TransferLine {
            product_id: ProductId::from_uuid(self.product_id),
            sent_quantity: self.quantity_sent,
            received_quantity: Some(self.quantity_received),
            send_price: self.send_price,
        }
    }
}

/// Transfer repository owning the transaction boundary for all transfer
/// mutations.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
    retries: u32,
}

impl TransferRepository {
    /// Creates a new transfer repository with the default conflict retry
    /// budget.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            retries: DEFAULT_CONFLICT_RETRIES,
        }
    }

    /// Overrides the conflict retry budget.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Creates a transfer, optionally committing it (which moves stock).
    ///
    /// # Errors
    ///
    /// `NotFound` for missing branch/user/product, `Validation` for an
    /// identical branch pair or bad lines, or a database error.
    pub async fn create(
        &self,
        input: CreateTransferInput,
    ) -> Result<TransferWithDetails, TransferError> {
        with_conflict_retry(self.retries, || self.create_inner(&input)).await
    }

    /// Replaces a transfer's date and full line set.
    ///
    /// On a committed transfer the old movement is reversed before the new
    /// lines' movement is applied.
    ///
    /// # Errors
    ///
    /// `NotFound` when the transfer or a product is missing, `EditCancelled`
    /// for cancelled transfers, `Validation` for bad lines, or a database
    /// error.
    pub async fn update(
        &self,
        transfer_id: TransferId,
        input: UpdateTransferInput,
    ) -> Result<TransferWithDetails, TransferError> {
        with_conflict_retry(self.retries, || self.update_inner(transfer_id, &input)).await
    }

    /// Deletes a transfer, reversing its movement when committed.
    ///
    /// # Errors
    ///
    /// `NotFound` when the transfer is missing, or a database error.
    pub async fn remove(&self, transfer_id: TransferId) -> Result<(), TransferError> {
        with_conflict_retry(self.retries, || self.remove_inner(transfer_id)).await
    }

    /// Moves a transfer to a new status.
    ///
    /// Committing applies the stock movement; cancelling a committed
    /// transfer reverses it. Cancelling a draft is a pure status change.
    ///
    /// # Errors
    ///
    /// `NotFound` when the transfer is missing, `Transition` when the move
    /// is not allowed, or a database error.
    pub async fn transition(
        &self,
        transfer_id: TransferId,
        to: TransferStatus,
    ) -> Result<TransferWithDetails, TransferError> {
        with_conflict_retry(self.retries, || self.transition_inner(transfer_id, to)).await
    }

    /// Loads a transfer with its detail lines.
    ///
    /// # Errors
    ///
    /// `NotFound` when the transfer is missing, or a database error.
    pub async fn get(&self, transfer_id: TransferId) -> Result<TransferWithDetails, TransferError> {
        let transfer = transfers::Entity::find_by_id(transfer_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(TransferError::NotFound(transfer_id.into_inner()))?;
        let details = transfer_details::Entity::find()
            .filter(transfer_details::Column::TransferId.eq(transfer.id))
            .order_by_asc(transfer_details::Column::Id)
            .all(&self.db)
            .await?;
        Ok(TransferWithDetails { transfer, details })
    }

    async fn create_inner(
        &self,
        input: &CreateTransferInput,
    ) -> Result<TransferWithDetails, TransferError> {
        let txn = self.db.begin().await?;

        catalog::require_branch(&txn, input.source_branch_id).await?;
        catalog::require_branch(&txn, input.dest_branch_id).await?;
        catalog::require_user(&txn, input.created_by).await?;
        if input.lines.is_empty() {
            return Err(TransferValidationError::EmptyLines.into());
        }

        let prepared = prepare_details(&txn, &input.lines).await?;
        let core_lines: Vec<TransferLine> =
            prepared.iter().map(PreparedDetail::as_core_line).collect();
        validate_lines(input.source_branch_id, input.dest_branch_id, &core_lines)?;

        let status = if input.commit {
            TransferStatus::Committed
        } else {
            TransferStatus::Draft
        };

        let sequence_value = sequence::allocate(
            &txn,
            vendra_core::sequence::TRANSFER_PREFIX,
            input.transfer_date,
        )
        .await?;
        let code = transfer_code(input.transfer_date, sequence_value);

        let now = Utc::now();
        let transfer_id = TransferId::new();
        let transfer = transfers::ActiveModel {
            id: Set(transfer_id.into_inner()),
            code: Set(code.clone()),
            source_branch_id: Set(input.source_branch_id.into_inner()),
            dest_branch_id: Set(input.dest_branch_id.into_inner()),
            status: Set(status.into()),
            total_value: Set(total_value(&core_lines)),
            created_by: Set(input.created_by.into_inner()),
            transfer_date: Set(input.transfer_date),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let transfer = transfer.insert(&txn).await?;

        let details = insert_details(&txn, transfer.id, &prepared).await?;

        if status == TransferStatus::Committed {
            let moves = movements(input.source_branch_id, input.dest_branch_id, &core_lines);
            inventory::apply_movements(&txn, &moves).await?;
        }

        txn.commit().await?;

        tracing::info!(
            transfer_id = %transfer_id,
            code = %code,
            status = ?status,
            "created transfer"
        );

        Ok(TransferWithDetails { transfer, details })
    }

    async fn update_inner(
        &self,
        transfer_id: TransferId,
        input: &UpdateTransferInput,
    ) -> Result<TransferWithDetails, TransferError> {
        let txn = self.db.begin().await?;

        let transfer = require_transfer(&txn, transfer_id).await?;
        let status: TransferStatus = transfer.status.into();
        if status == TransferStatus::Cancelled {
            return Err(TransferError::EditCancelled(transfer.id));
        }
        if input.lines.is_empty() {
            return Err(TransferValidationError::EmptyLines.into());
        }

        let source = BranchId::from_uuid(transfer.source_branch_id);
        let dest = BranchId::from_uuid(transfer.dest_branch_id);

        if status == TransferStatus::Committed {
            let applied = applied_movements(&txn, &transfer).await?;
            inventory::apply_movements(&txn, &reverse_movements(&applied)).await?;
        }

        transfer_details::Entity::delete_many()
            .filter(transfer_details::Column::TransferId.eq(transfer.id))
            .exec(&txn)
            .await?;

        let prepared = prepare_details(&txn, &input.lines).await?;
        let core_lines: Vec<TransferLine> =
            prepared.iter().map(PreparedDetail::as_core_line).collect();
        validate_lines(source, dest, &core_lines)?;

        let mut active: transfers::ActiveModel = transfer.clone().into();
        active.transfer_date = Set(input.transfer_date);
        active.total_value = Set(total_value(&core_lines));
        active.updated_at = Set(Utc::now());
        let transfer = active.update(&txn).await?;

        let details = insert_details(&txn, transfer.id, &prepared).await?;

        if status == TransferStatus::Committed {
            let moves = movements(source, dest, &core_lines);
            inventory::apply_movements(&txn, &moves).await?;
        }

        txn.commit().await?;

        tracing::info!(transfer_id = %transfer_id, code = %transfer.code, "updated transfer");
        Ok(TransferWithDetails { transfer, details })
    }

    async fn remove_inner(&self, transfer_id: TransferId) -> Result<(), TransferError> {
        let txn = self.db.begin().await?;

        let transfer = require_transfer(&txn, transfer_id).await?;
        let status: TransferStatus = transfer.status.into();

        if status == TransferStatus::Committed {
            let applied = applied_movements(&txn, &transfer).await?;
            inventory::apply_movements(&txn, &reverse_movements(&applied)).await?;
        }

        transfer_details::Entity::delete_many()
            .filter(transfer_details::Column::TransferId.eq(transfer.id))
            .exec(&txn)
            .await?;
        transfers::Entity::delete_by_id(transfer.id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(transfer_id = %transfer_id, code = %transfer.code, "removed transfer");
        Ok(())
    }

    async fn transition_inner(
        &self,
        transfer_id: TransferId,
        to: TransferStatus,
    ) -> Result<TransferWithDetails, TransferError> {
        let txn = self.db.begin().await?;

        let transfer = require_transfer(&txn, transfer_id).await?;
        let from: TransferStatus = transfer.status.into();
        validate_transfer_transition(from, to)?;

        match (from, to) {
            (TransferStatus::Draft, TransferStatus::Committed) => {
                let applied = applied_movements(&txn, &transfer).await?;
                inventory::apply_movements(&txn, &applied).await?;
            }
            (TransferStatus::Committed, TransferStatus::Cancelled) => {
                let applied = applied_movements(&txn, &transfer).await?;
                inventory::apply_movements(&txn, &reverse_movements(&applied)).await?;
            }
            _ => {}
        }

        let mut active: transfers::ActiveModel = transfer.clone().into();
        active.status = Set(to.into());
        active.updated_at = Set(Utc::now());
        let transfer = active.update(&txn).await?;

        let details = transfer_details::Entity::find()
            .filter(transfer_details::Column::TransferId.eq(transfer.id))
            .order_by_asc(transfer_details::Column::Id)
            .all(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(
            transfer_id = %transfer_id,
            code = %transfer.code,
            from = ?from,
            to = ?to,
            "transitioned transfer"
        );

        Ok(TransferWithDetails { transfer, details })
    }
}

async fn require_transfer(
    txn: &DatabaseTransaction,
    transfer_id: TransferId,
) -> Result<transfers::Model, TransferError> {
    transfers::Entity::find_by_id(transfer_id.into_inner())
        .one(txn)
        .await?
        .ok_or(TransferError::NotFound(transfer_id.into_inner()))
}

/// Snapshots products and fills in defaulted prices for a line set.
async fn prepare_details(
    txn: &DatabaseTransaction,
    lines: &[TransferLineInput],
) -> Result<Vec<PreparedDetail>, TransferError> {
    let mut prepared = Vec::with_capacity(lines.len());
    for line in lines {
        let product = catalog::require_product(txn, line.product_id).await?;
        let send_price = line.send_price.unwrap_or(product.base_price);
        prepared.push(PreparedDetail {
            product_id: product.id,
            product_code: product.code,
            product_name: product.name,
            quantity_sent: line.quantity_sent,
            quantity_received: line.quantity_received.unwrap_or(line.quantity_sent),
            send_price,
            receive_price: line.receive_price.unwrap_or(send_price),
        });
    }
    Ok(prepared)
}

async fn insert_details(
    txn: &DatabaseTransaction,
    transfer_id: Uuid,
    prepared: &[PreparedDetail],
) -> Result<Vec<transfer_details::Model>, TransferError> {
    let mut inserted = Vec::with_capacity(prepared.len());
    for detail in prepared {
        let row = transfer_details::ActiveModel {
            id: Set(Uuid::now_v7()),
            transfer_id: Set(transfer_id),
            product_id: Set(detail.product_id),
            product_code: Set(detail.product_code.clone()),
            product_name: Set(detail.product_name.clone()),
            quantity_sent: Set(detail.quantity_sent),
            quantity_received: Set(detail.quantity_received),
            send_price: Set(detail.send_price),
            receive_price: Set(detail.receive_price),
        };
        inserted.push(row.insert(txn).await?);
    }
    Ok(inserted)
}

/// Rebuilds the stock movement a committed transfer applied, from its
/// stored detail rows.
async fn applied_movements(
    txn: &DatabaseTransaction,
    transfer: &transfers::Model,
) -> Result<Vec<StockMovement>, TransferError> {
    let details = transfer_details::Entity::find()
        .filter(transfer_details::Column::TransferId.eq(transfer.id))
        .all(txn)
        .await?;

    let core_lines: Vec<TransferLine> = details
        .iter()
        .map(|detail| TransferLine {
            product_id: ProductId::from_uuid(detail.product_id),
            sent_quantity: detail.quantity_sent,
            received_quantity: Some(detail.quantity_received),
            send_price: detail.send_price,
        })
        .collect();

    Ok(movements(
        BranchId::from_uuid(transfer.source_branch_id),
        BranchId::from_uuid(transfer.dest_branch_id),
        &core_lines,
    ))
}
