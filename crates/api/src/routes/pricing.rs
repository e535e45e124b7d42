//! Pricing query routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;

use vendra_db::PricingRepository;
use vendra_shared::types::{BranchId, CounterpartyId, ProductId, UserId};

use crate::{AppState, error::ApiError};

/// Creates the pricing routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pricing/resolve", get(resolve_price))
        .route("/pricing/price-lists", get(applicable_lists))
}

/// Query parameters for a price resolution.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// The product to price.
    pub product_id: ProductId,
    /// Branch of the sale.
    pub branch_id: Option<BranchId>,
    /// Customer of the sale.
    pub customer_id: Option<CounterpartyId>,
    /// Acting user.
    pub user_id: Option<UserId>,
    /// Date the price must be valid on.
    pub date: NaiveDate,
}

/// Query parameters for listing applicable price lists.
#[derive(Debug, Deserialize)]
pub struct ApplicableListsQuery {
    /// Branch of the sale.
    pub branch_id: Option<BranchId>,
    /// Customer of the sale.
    pub customer_id: Option<CounterpartyId>,
    /// Acting user.
    pub user_id: Option<UserId>,
    /// Date the lists must be valid on.
    pub date: NaiveDate,
}

/// GET /pricing/resolve - Resolve the unit price for one product.
async fn resolve_price(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PricingRepository::new((*state.db).clone());

    let resolved = repo
        .resolve(
            query.product_id,
            query.branch_id,
            query.customer_id,
            query.user_id,
            query.date,
        )
        .await?;

    Ok(Json(resolved))
}

/// GET /pricing/price-lists - Ranked applicable price lists for a context.
async fn applicable_lists(
    State(state): State<AppState>,
    Query(query): Query<ApplicableListsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PricingRepository::new((*state.db).clone());

    let ranked = repo
        .applicable_lists(query.branch_id, query.customer_id, query.user_id, query.date)
        .await?;

    Ok(Json(ranked))
}
