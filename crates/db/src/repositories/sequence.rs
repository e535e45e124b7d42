//! Per-kind, per-day code sequence allocation.
//!
//! `next_value` moves only through an insert-unique / guarded-update pair,
//! so two concurrent allocations can never hand out the same number. A lost
//! race surfaces as [`SequenceError::Conflict`] and is retried by the
//! calling operation's wrapper.

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, Set,
};

use vendra_shared::AppError;

use crate::entities::document_sequences;

use super::{is_unique_violation, ConflictCheck};

/// Error types for sequence allocation.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// Another transaction allocated the same value first.
    #[error("Concurrent sequence allocation for '{0}'")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ConflictCheck for SequenceError {
    fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<SequenceError> for AppError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::Conflict(_) => Self::Conflict(err.to_string()),
            SequenceError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Allocates the next sequence value for a document type on a date.
///
/// The first allocation of a (type, date) pair inserts the row; later
/// allocations bump `next_value` with an optimistic compare on the expected
/// current value.
///
/// # Errors
///
/// Returns [`SequenceError::Conflict`] when a concurrent allocation won the
/// race, or a database error.
pub async fn allocate(
    txn: &DatabaseTransaction,
    doc_type: &str,
    date: NaiveDate,
) -> Result<i64, SequenceError> {
    let existing = document_sequences::Entity::find_by_id((doc_type.to_string(), date))
        .one(txn)
        .await?;

    match existing {
        None => {
            let row = document_sequences::ActiveModel {
                doc_type: Set(doc_type.to_string()),
                seq_date: Set(date),
                next_value: Set(2),
            };
            match document_sequences::Entity::insert(row).exec(txn).await {
                Ok(_) => Ok(1),
                Err(err) if is_unique_violation(&err) => {
                    Err(SequenceError::Conflict(doc_type.to_string()))
                }
                Err(err) => Err(err.into()),
            }
        }
        Some(row) => {
            let current = row.next_value;
            let updated = document_sequences::Entity::update_many()
                .col_expr(
                    document_sequences::Column::NextValue,
                    sea_orm::sea_query::Expr::value(current + 1),
                )
                .filter(document_sequences::Column::DocType.eq(doc_type))
                .filter(document_sequences::Column::SeqDate.eq(date))
                .filter(document_sequences::Column::NextValue.eq(current))
                .exec(txn)
                .await?;

            if updated.rows_affected == 0 {
                return Err(SequenceError::Conflict(doc_type.to_string()));
            }
            Ok(current)
        }
    }
}
