//! Catalog lookups shared by the document and transfer repositories.
//!
//! All functions are generic over `ConnectionTrait` so they can run either
//! on a plain connection or inside a caller's transaction.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use uuid::Uuid;

use vendra_shared::types::{BranchId, ProductId, UserId};
use vendra_shared::AppError;

use crate::entities::{branches, products, users};

/// Error types for catalog lookups.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Branch not found.
    #[error("Branch not found: {0}")]
    BranchNotFound(Uuid),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ProductNotFound(_)
            | CatalogError::BranchNotFound(_)
            | CatalogError::UserNotFound(_) => Self::NotFound(err.to_string()),
            CatalogError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Loads a product or fails with `ProductNotFound`.
///
/// # Errors
///
/// Returns an error if the product does not exist or the query fails.
pub async fn require_product<C: ConnectionTrait>(
    conn: &C,
    id: ProductId,
) -> Result<products::Model, CatalogError> {
    products::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(CatalogError::ProductNotFound(id.into_inner()))
}

/// Loads a branch or fails with `BranchNotFound`.
///
/// # Errors
///
/// Returns an error if the branch does not exist or the query fails.
pub async fn require_branch<C: ConnectionTrait>(
    conn: &C,
    id: BranchId,
) -> Result<branches::Model, CatalogError> {
    branches::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(CatalogError::BranchNotFound(id.into_inner()))
}

/// Loads a user or fails with `UserNotFound`.
///
/// # Errors
///
/// Returns an error if the user does not exist or the query fails.
pub async fn require_user<C: ConnectionTrait>(
    conn: &C,
    id: UserId,
) -> Result<users::Model, CatalogError> {
    users::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(CatalogError::UserNotFound(id.into_inner()))
}
