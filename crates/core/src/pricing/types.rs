//! Pricing domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vendra_shared::types::{BranchId, CounterpartyId, CustomerGroupId, PriceListId, ProductId, UserId};

/// The sales context a price is resolved for.
///
/// Every field except the effective date is optional: a context with no
/// branch, customer, or user can still match global price lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingContext {
    /// Branch the sale happens at.
    pub branch_id: Option<BranchId>,
    /// Customer the sale is for.
    pub customer_id: Option<CounterpartyId>,
    /// Group memberships of that customer (resolved by the caller).
    pub customer_group_ids: Vec<CustomerGroupId>,
    /// Acting user.
    pub user_id: Option<UserId>,
    /// Date the price must be valid on.
    pub effective_date: NaiveDate,
}

impl PricingContext {
    /// Creates an empty context for the given date.
    #[must_use]
    pub fn on(effective_date: NaiveDate) -> Self {
        Self {
            branch_id: None,
            customer_id: None,
            customer_group_ids: Vec::new(),
            user_id: None,
            effective_date,
        }
    }
}

/// A price list with its scope sets, preloaded for eligibility matching.
///
/// A list restricted to no branch/group/user and with neither "apply to all"
/// flag set is eligible to nobody unless it is marked global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListInfo {
    /// The price list ID.
    pub id: PriceListId,
    /// Display name.
    pub name: String,
    /// Whether the list is active at all.
    pub active: bool,
    /// Whether the list applies to every context.
    pub is_global: bool,
    /// Inclusive validity window start (absent = unbounded).
    pub start_date: Option<NaiveDate>,
    /// Inclusive validity window end (absent = unbounded).
    pub end_date: Option<NaiveDate>,
    /// Higher priority wins when several lists match.
    pub priority: i32,
    /// Whether sales documents may include products absent from this list.
    pub allow_non_listed: bool,
    /// Whether selling a non-listed product should raise a warning.
    pub warn_non_listed: bool,
    /// Matches any customer group (customer still required in context).
    pub apply_all_customer_groups: bool,
    /// Matches any user (user still required in context).
    pub apply_all_users: bool,
    /// Eligible branches.
    pub branch_ids: Vec<BranchId>,
    /// Eligible customer groups.
    pub customer_group_ids: Vec<CustomerGroupId>,
    /// Eligible users.
    pub user_ids: Vec<UserId>,
    /// Creation time, used as the deterministic ranking tiebreak.
    pub created_at: DateTime<Utc>,
}

/// The outcome of resolving a unit price for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    /// The list the price came from, if any.
    pub price_list_id: Option<PriceListId>,
    /// Name of that list, for display and warnings.
    pub price_list_name: Option<String>,
    /// The resolved unit price.
    pub price: Decimal,
    /// Non-listed policy of the matched list (fallback: allow, no warn).
    pub allow_non_listed: bool,
    /// Warn flag of the matched list (fallback: false).
    pub warn_non_listed: bool,
    /// Catalog base price, regardless of which list matched.
    pub original_price: Decimal,
}

impl ResolvedPrice {
    /// The unconstrained catalog fallback used when no list carries the product.
    #[must_use]
    pub fn fallback(base_price: Decimal) -> Self {
        Self {
            price_list_id: None,
            price_list_name: None,
            price: base_price,
            allow_non_listed: true,
            warn_non_listed: false,
            original_price: base_price,
        }
    }
}

/// A non-fatal warning attached to a sales-document creation result.
///
/// Warnings are returned to the caller only; they are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingWarning {
    /// The product that is missing from the primary price list.
    pub product_id: ProductId,
    /// Product code, for display.
    pub product_code: String,
    /// The primary price list the product is missing from.
    pub price_list_id: PriceListId,
    /// Human-readable message.
    pub message: String,
}
