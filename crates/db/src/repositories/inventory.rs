//! Guarded inventory adjustments.
//!
//! Stock is only ever touched by the Document and Transfer repositories,
//! inside their transactions. Every adjustment is an optimistic guarded
//! update on the expected `on_hand` value; a lost race surfaces as
//! [`InventoryError::Conflict`]. Stock is allowed to go negative (a sale can
//! be booked before the goods-in paperwork catches up).

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use vendra_core::transfer::StockMovement;
use vendra_shared::types::{BranchId, ProductId};
use vendra_shared::AppError;

use crate::entities::inventory;

use super::{is_unique_violation, ConflictCheck};

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// Another transaction changed the same stock level first.
    #[error("Concurrent inventory update for product {product_id} at branch {branch_id}")]
    Conflict {
        /// The contended product.
        product_id: Uuid,
        /// The contended branch.
        branch_id: Uuid,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ConflictCheck for InventoryError {
    fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Conflict { .. } => Self::Conflict(err.to_string()),
            InventoryError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Adjusts `on_hand` for one (product, branch) pair by a signed delta.
///
/// Creates the inventory row on first touch. A concurrent create or a
/// guarded update that matches no row maps to a conflict.
///
/// # Errors
///
/// Returns [`InventoryError::Conflict`] on a lost race, or a database error.
pub async fn adjust_on_hand(
    txn: &DatabaseTransaction,
    product_id: ProductId,
    branch_id: BranchId,
    delta: Decimal,
) -> Result<(), InventoryError> {
    let product = product_id.into_inner();
    let branch = branch_id.into_inner();

    let existing = inventory::Entity::find_by_id((product, branch))
        .one(txn)
        .await?;

    match existing {
        None => {
            let row = inventory::ActiveModel {
                product_id: Set(product),
                branch_id: Set(branch),
                on_hand: Set(delta),
                reserved: Set(Decimal::ZERO),
                reorder_level: Set(Decimal::ZERO),
                updated_at: Set(Utc::now()),
            };
            match inventory::Entity::insert(row).exec(txn).await {
                Ok(_) => Ok(()),
                Err(err) if is_unique_violation(&err) => Err(InventoryError::Conflict {
                    product_id: product,
                    branch_id: branch,
                }),
                Err(err) => Err(err.into()),
            }
        }
        Some(level) => {
            let current = level.on_hand;
            let updated = inventory::Entity::update_many()
                .col_expr(
                    inventory::Column::OnHand,
                    sea_orm::sea_query::Expr::value(current + delta),
                )
                .col_expr(
                    inventory::Column::UpdatedAt,
                    sea_orm::sea_query::Expr::value(Utc::now()),
                )
                .filter(inventory::Column::ProductId.eq(product))
                .filter(inventory::Column::BranchId.eq(branch))
                .filter(inventory::Column::OnHand.eq(current))
                .exec(txn)
                .await?;

            if updated.rows_affected == 0 {
                return Err(InventoryError::Conflict {
                    product_id: product,
                    branch_id: branch,
                });
            }
            Ok(())
        }
    }
}

/// Applies a batch of stock movements in order.
///
/// # Errors
///
/// Returns the first adjustment failure; the caller's transaction rollback
/// undoes any earlier movements of the batch.
pub async fn apply_movements(
    txn: &DatabaseTransaction,
    movements: &[StockMovement],
) -> Result<(), InventoryError> {
    for movement in movements {
        adjust_on_hand(txn, movement.product_id, movement.branch_id, movement.delta).await?;
    }
    Ok(())
}
