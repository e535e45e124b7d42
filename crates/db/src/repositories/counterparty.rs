//! Counterparty lookups.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use uuid::Uuid;

use vendra_shared::types::CounterpartyId;
use vendra_shared::AppError;

use crate::entities::counterparties;

/// Error types for counterparty lookups.
#[derive(Debug, thiserror::Error)]
pub enum CounterpartyError {
    /// Counterparty not found.
    #[error("Counterparty not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CounterpartyError> for AppError {
    fn from(err: CounterpartyError) -> Self {
        match err {
            CounterpartyError::NotFound(_) => Self::NotFound(err.to_string()),
            CounterpartyError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Loads a counterparty or fails with `NotFound`.
///
/// # Errors
///
/// Returns an error if the counterparty does not exist or the query fails.
pub async fn require_counterparty<C: ConnectionTrait>(
    conn: &C,
    id: CounterpartyId,
) -> Result<counterparties::Model, CounterpartyError> {
    counterparties::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(CounterpartyError::NotFound(id.into_inner()))
}
