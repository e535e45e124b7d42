//! Counterparty balance recomputation.
//!
//! Always a full re-scan of the counterparty's non-cancelled documents,
//! run inside the same transaction as the mutation that triggered it.
//! Incremental patching of the totals is deliberately not offered.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use vendra_core::balance::{aggregate_balance, BalanceSource, CounterpartyBalance};
use vendra_shared::types::CounterpartyId;
use vendra_shared::AppError;

use crate::entities::{counterparties, documents};

/// Error types for balance recomputation.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    /// Counterparty not found.
    #[error("Counterparty not found: {0}")]
    CounterpartyNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BalanceError> for AppError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::CounterpartyNotFound(_) => Self::NotFound(err.to_string()),
            BalanceError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Recomputes and writes `total_purchased` / `total_debt` for one
/// counterparty from its documents.
///
/// Idempotent: recomputing twice without an intervening mutation writes the
/// same values.
///
/// # Errors
///
/// Returns an error if the counterparty does not exist or a query fails.
pub async fn recompute(
    txn: &DatabaseTransaction,
    counterparty_id: CounterpartyId,
) -> Result<CounterpartyBalance, BalanceError> {
    let rows = documents::Entity::find()
        .filter(documents::Column::CounterpartyId.eq(counterparty_id.into_inner()))
        .all(txn)
        .await?;

    let sources: Vec<BalanceSource> = rows
        .iter()
        .map(|doc| BalanceSource {
            status: doc.status.into(),
            grand_total: doc.grand_total,
            debt_amount: doc.debt_amount,
        })
        .collect();

    let balance = aggregate_balance(&sources);

    let updated = counterparties::Entity::update_many()
        .col_expr(
            counterparties::Column::TotalPurchased,
            sea_orm::sea_query::Expr::value(balance.total_purchased),
        )
        .col_expr(
            counterparties::Column::TotalDebt,
            sea_orm::sea_query::Expr::value(balance.total_debt),
        )
        .col_expr(
            counterparties::Column::UpdatedAt,
            sea_orm::sea_query::Expr::value(Utc::now()),
        )
        .filter(counterparties::Column::Id.eq(counterparty_id.into_inner()))
        .exec(txn)
        .await?;

    if updated.rows_affected == 0 {
        return Err(BalanceError::CounterpartyNotFound(
            counterparty_id.into_inner(),
        ));
    }

    tracing::debug!(
        counterparty_id = %counterparty_id,
        "recomputed counterparty balance"
    );
    Ok(balance)
}
