//! Price list loading and price resolution.
//!
//! Loads candidate lists with their scope sets, delegates eligibility and
//! ranking to `vendra_core::pricing`, and preloads product entries into the
//! lookup the core resolver consumes.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use vendra_core::pricing::{
    applicable_price_lists, resolve_price, PriceListInfo, PricingContext, ResolvedPrice,
};
use vendra_shared::types::{
    BranchId, CounterpartyId, CustomerGroupId, PriceListId, ProductId, UserId,
};
use vendra_shared::AppError;

use crate::entities::{
    customer_group_members, price_list_branches, price_list_customer_groups, price_list_entries,
    price_list_users, price_lists, products,
};

use super::catalog::{self, CatalogError};

/// Error types for pricing data access.
#[derive(Debug, thiserror::Error)]
pub enum PricingRepoError {
    /// Referenced catalog record missing.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PricingRepoError> for AppError {
    fn from(err: PricingRepoError) -> Self {
        match err {
            PricingRepoError::Catalog(inner) => inner.into(),
            PricingRepoError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Builds a pricing context, resolving the customer's group memberships.
///
/// # Errors
///
/// Returns an error if the membership query fails.
pub async fn load_context<C: ConnectionTrait>(
    conn: &C,
    branch_id: Option<BranchId>,
    customer_id: Option<CounterpartyId>,
    user_id: Option<UserId>,
    effective_date: NaiveDate,
) -> Result<PricingContext, PricingRepoError> {
    let mut ctx = PricingContext::on(effective_date);
    ctx.branch_id = branch_id;
    ctx.customer_id = customer_id;
    ctx.user_id = user_id;

    if let Some(customer) = customer_id {
        let memberships = customer_group_members::Entity::find()
            .filter(customer_group_members::Column::CounterpartyId.eq(customer.into_inner()))
            .all(conn)
            .await?;
        ctx.customer_group_ids = memberships
            .into_iter()
            .map(|row| CustomerGroupId::from_uuid(row.customer_group_id))
            .collect();
    }

    Ok(ctx)
}

/// Loads all active price lists with scope sets and ranks them for the
/// context.
///
/// # Errors
///
/// Returns an error if any of the load queries fail.
pub async fn load_applicable_lists<C: ConnectionTrait>(
    conn: &C,
    ctx: &PricingContext,
) -> Result<Vec<PriceListInfo>, PricingRepoError> {
    let lists = price_lists::Entity::find()
        .filter(price_lists::Column::Active.eq(true))
        .all(conn)
        .await?;

    let list_ids: Vec<Uuid> = lists.iter().map(|list| list.id).collect();

    let mut branch_scopes: HashMap<Uuid, Vec<BranchId>> = HashMap::new();
    for row in price_list_branches::Entity::find()
        .filter(price_list_branches::Column::PriceListId.is_in(list_ids.clone()))
        .all(conn)
        .await?
    {
        branch_scopes
            .entry(row.price_list_id)
            .or_default()
            .push(BranchId::from_uuid(row.branch_id));
    }

    let mut group_scopes: HashMap<Uuid, Vec<CustomerGroupId>> = HashMap::new();
    for row in price_list_customer_groups::Entity::find()
        .filter(price_list_customer_groups::Column::PriceListId.is_in(list_ids.clone()))
        .all(conn)
        .await?
    {
        group_scopes
            .entry(row.price_list_id)
            .or_default()
            .push(CustomerGroupId::from_uuid(row.customer_group_id));
    }

    let mut user_scopes: HashMap<Uuid, Vec<UserId>> = HashMap::new();
    for row in price_list_users::Entity::find()
        .filter(price_list_users::Column::PriceListId.is_in(list_ids))
        .all(conn)
        .await?
    {
        user_scopes
            .entry(row.price_list_id)
            .or_default()
            .push(UserId::from_uuid(row.user_id));
    }

    let infos: Vec<PriceListInfo> = lists
        .into_iter()
        .map(|list| PriceListInfo {
            id: PriceListId::from_uuid(list.id),
            name: list.name,
            active: list.active,
            is_global: list.is_global,
            start_date: list.start_date,
            end_date: list.end_date,
            priority: list.priority,
            allow_non_listed: list.allow_non_listed,
            warn_non_listed: list.warn_non_listed,
            apply_all_customer_groups: list.apply_all_customer_groups,
            apply_all_users: list.apply_all_users,
            branch_ids: branch_scopes.remove(&list.id).unwrap_or_default(),
            customer_group_ids: group_scopes.remove(&list.id).unwrap_or_default(),
            user_ids: user_scopes.remove(&list.id).unwrap_or_default(),
            created_at: list.created_at,
        })
        .collect();

    Ok(applicable_price_lists(infos, ctx))
}

/// Preloads the product's active entries across the ranked lists.
///
/// # Errors
///
/// Returns an error if the entry query fails.
pub async fn load_entry_prices<C: ConnectionTrait>(
    conn: &C,
    ranked: &[PriceListInfo],
    product_id: ProductId,
) -> Result<HashMap<PriceListId, Decimal>, PricingRepoError> {
    let list_ids: HashSet<Uuid> = ranked.iter().map(|list| list.id.into_inner()).collect();

    let entries = price_list_entries::Entity::find()
        .filter(price_list_entries::Column::ProductId.eq(product_id.into_inner()))
        .filter(price_list_entries::Column::Active.eq(true))
        .filter(price_list_entries::Column::PriceListId.is_in(list_ids))
        .all(conn)
        .await?;

    Ok(entries
        .into_iter()
        .map(|entry| (PriceListId::from_uuid(entry.price_list_id), entry.price))
        .collect())
}

/// Resolves the unit price for one product against already-ranked lists.
///
/// # Errors
///
/// Returns an error if the entry query fails.
pub async fn resolve_for_product<C: ConnectionTrait>(
    conn: &C,
    ranked: &[PriceListInfo],
    product: &products::Model,
) -> Result<ResolvedPrice, PricingRepoError> {
    let entries = load_entry_prices(conn, ranked, ProductId::from_uuid(product.id)).await?;

    Ok(resolve_price(
        ProductId::from_uuid(product.id),
        product.base_price,
        ranked,
        |list_id, _product| entries.get(&list_id).copied(),
    ))
}

/// Read-side repository for pricing queries exposed over the API.
#[derive(Debug, Clone)]
pub struct PricingRepository {
    db: DatabaseConnection,
}

impl PricingRepository {
    /// Creates a new pricing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Ranked applicable price lists for a context.
    ///
    /// # Errors
    ///
    /// Returns an error if a load query fails.
    pub async fn applicable_lists(
        &self,
        branch_id: Option<BranchId>,
        customer_id: Option<CounterpartyId>,
        user_id: Option<UserId>,
        effective_date: NaiveDate,
    ) -> Result<Vec<PriceListInfo>, PricingRepoError> {
        let ctx = load_context(&self.db, branch_id, customer_id, user_id, effective_date).await?;
        load_applicable_lists(&self.db, &ctx).await
    }

    /// Resolves the price of one product for a context.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing or a load query fails.
    pub async fn resolve(
        &self,
        product_id: ProductId,
        branch_id: Option<BranchId>,
        customer_id: Option<CounterpartyId>,
        user_id: Option<UserId>,
        effective_date: NaiveDate,
    ) -> Result<ResolvedPrice, PricingRepoError> {
        let product = catalog::require_product(&self.db, product_id).await?;
        let ctx = load_context(&self.db, branch_id, customer_id, user_id, effective_date).await?;
        let ranked = load_applicable_lists(&self.db, &ctx).await?;
        resolve_for_product(&self.db, &ranked, &product).await
    }
}
