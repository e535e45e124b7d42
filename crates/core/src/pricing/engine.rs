//! Price list applicability filtering and price resolution.
//!
//! This module contains pure functions with no database dependencies.
//! The caller preloads price lists (with scope sets) and product entries,
//! then delegates eligibility and resolution decisions here.

use rust_decimal::Decimal;
use vendra_shared::types::{PriceListId, ProductId};

use super::types::{PriceListInfo, PricingContext, ResolvedPrice};

/// Returns true if the price list is applicable for the given context.
///
/// A list is applicable iff it is active, the effective date falls within its
/// inclusive `[start_date, end_date]` window (an absent bound is unbounded),
/// and at least one eligibility dimension matches:
///
/// - the list is global; or
/// - the context branch is one of the eligible branches; or
/// - the context has a customer and one of its groups is eligible
///   (or the list applies to all customer groups); or
/// - the context user is eligible (or the list applies to all users).
#[must_use]
pub fn is_applicable(list: &PriceListInfo, ctx: &PricingContext) -> bool {
    if !list.active {
        return false;
    }

    if let Some(start) = list.start_date {
        if ctx.effective_date < start {
            return false;
        }
    }
    if let Some(end) = list.end_date {
        if ctx.effective_date > end {
            return false;
        }
    }

    if list.is_global {
        return true;
    }

    let branch_match = ctx
        .branch_id
        .is_some_and(|branch| list.branch_ids.contains(&branch));

    let group_match = ctx.customer_id.is_some()
        && (list.apply_all_customer_groups
            || ctx
                .customer_group_ids
                .iter()
                .any(|group| list.customer_group_ids.contains(group)));

    let user_match = ctx
        .user_id
        .is_some_and(|user| list.apply_all_users || list.user_ids.contains(&user));

    branch_match || group_match || user_match
}

/// Filters and ranks price lists for a context.
///
/// The result is ordered highest priority first. Ties are broken by creation
/// time (earlier wins) and then by ID, so repeated calls over the same catalog
/// state always produce the same order.
#[must_use]
pub fn applicable_price_lists(
    lists: Vec<PriceListInfo>,
    ctx: &PricingContext,
) -> Vec<PriceListInfo> {
    let mut applicable: Vec<PriceListInfo> = lists
        .into_iter()
        .filter(|list| is_applicable(list, ctx))
        .collect();

    applicable.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.into_inner().cmp(&b.id.into_inner()))
    });

    applicable
}

/// Resolves the unit price of a product against ranked price lists.
///
/// Iterates the (already ranked) applicable lists and returns the first
/// active entry found. If no list carries the product the catalog base price
/// is used with the unconstrained fallback policy. `original_price` is always
/// the catalog base price, so callers can display discount-from-list-price.
pub fn resolve_price<F>(
    product_id: ProductId,
    base_price: Decimal,
    ranked_lists: &[PriceListInfo],
    entry_lookup: F,
) -> ResolvedPrice
where
    F: Fn(PriceListId, ProductId) -> Option<Decimal>,
{
    for list in ranked_lists {
        if let Some(price) = entry_lookup(list.id, product_id) {
            return ResolvedPrice {
                price_list_id: Some(list.id),
                price_list_name: Some(list.name.clone()),
                price,
                allow_non_listed: list.allow_non_listed,
                warn_non_listed: list.warn_non_listed,
                original_price: base_price,
            };
        }
    }

    ResolvedPrice::fallback(base_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use vendra_shared::types::{BranchId, CounterpartyId, CustomerGroupId, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_list(name: &str, priority: i32) -> PriceListInfo {
        PriceListInfo {
            id: PriceListId::new(),
            name: name.to_string(),
            active: true,
            is_global: true,
            start_date: None,
            end_date: None,
            priority,
            allow_non_listed: true,
            warn_non_listed: false,
            apply_all_customer_groups: false,
            apply_all_users: false,
            branch_ids: vec![],
            customer_group_ids: vec![],
            user_ids: vec![],
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn ctx() -> PricingContext {
        PricingContext::on(date(2026, 6, 15))
    }

    #[test]
    fn test_inactive_list_never_applies() {
        let mut list = make_list("inactive", 10);
        list.active = false;
        assert!(!is_applicable(&list, &ctx()));
    }

    #[test]
    fn test_date_window_is_inclusive() {
        let mut list = make_list("windowed", 1);
        list.start_date = Some(date(2026, 6, 1));
        list.end_date = Some(date(2026, 6, 15));
        assert!(is_applicable(&list, &ctx()));

        list.end_date = Some(date(2026, 6, 14));
        assert!(!is_applicable(&list, &ctx()));

        list.end_date = None;
        list.start_date = Some(date(2026, 6, 16));
        assert!(!is_applicable(&list, &ctx()));
    }

    #[test]
    fn test_unscoped_non_global_list_applies_to_nobody() {
        let mut list = make_list("orphan", 5);
        list.is_global = false;

        let mut context = ctx();
        context.branch_id = Some(BranchId::new());
        context.customer_id = Some(CounterpartyId::new());
        context.customer_group_ids = vec![CustomerGroupId::new()];
        context.user_id = Some(UserId::new());

        assert!(!is_applicable(&list, &context));
    }

    #[test]
    fn test_branch_scope_match() {
        let branch = BranchId::new();
        let mut list = make_list("branch-scoped", 5);
        list.is_global = false;
        list.branch_ids = vec![branch];

        let mut context = ctx();
        assert!(!is_applicable(&list, &context));

        context.branch_id = Some(branch);
        assert!(is_applicable(&list, &context));
    }

    #[test]
    fn test_customer_group_scope_match() {
        let group = CustomerGroupId::new();
        let mut list = make_list("group-scoped", 5);
        list.is_global = false;
        list.customer_group_ids = vec![group];

        let mut context = ctx();
        context.customer_id = Some(CounterpartyId::new());
        context.customer_group_ids = vec![CustomerGroupId::new()];
        assert!(!is_applicable(&list, &context));

        context.customer_group_ids.push(group);
        assert!(is_applicable(&list, &context));
    }

    #[test]
    fn test_apply_all_groups_requires_a_customer() {
        let mut list = make_list("all-groups", 5);
        list.is_global = false;
        list.apply_all_customer_groups = true;

        let mut context = ctx();
        assert!(!is_applicable(&list, &context));

        context.customer_id = Some(CounterpartyId::new());
        assert!(is_applicable(&list, &context));
    }

    #[test]
    fn test_user_scope_and_apply_all_users() {
        let user = UserId::new();
        let mut list = make_list("user-scoped", 5);
        list.is_global = false;
        list.user_ids = vec![user];

        let mut context = ctx();
        context.user_id = Some(UserId::new());
        assert!(!is_applicable(&list, &context));

        context.user_id = Some(user);
        assert!(is_applicable(&list, &context));

        list.user_ids.clear();
        list.apply_all_users = true;
        assert!(is_applicable(&list, &context));
    }

    #[test]
    fn test_priority_outranks_creation_order() {
        let mut older_low = make_list("older-low", 5);
        older_low.created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let newer_high = make_list("newer-high", 10);

        let ranked = applicable_price_lists(vec![older_low, newer_high], &ctx());
        assert_eq!(ranked[0].name, "newer-high");
        assert_eq!(ranked[1].name, "older-low");
    }

    #[test]
    fn test_equal_priority_breaks_tie_by_creation_time() {
        let mut first = make_list("first", 5);
        first.created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut second = make_list("second", 5);
        second.created_at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let ranked = applicable_price_lists(vec![second, first], &ctx());
        assert_eq!(ranked[0].name, "first");
    }

    #[test]
    fn test_resolve_price_first_match_wins() {
        let high = make_list("high", 10);
        let low = make_list("low", 5);
        let high_id = high.id;
        let low_id = low.id;
        let product = ProductId::new();

        let ranked = applicable_price_lists(vec![low, high], &ctx());
        let resolved = resolve_price(product, dec!(100), &ranked, |list_id, _| {
            if list_id == high_id {
                Some(dec!(80))
            } else if list_id == low_id {
                Some(dec!(70))
            } else {
                None
            }
        });

        assert_eq!(resolved.price, dec!(80));
        assert_eq!(resolved.price_list_id, Some(high_id));
        assert_eq!(resolved.original_price, dec!(100));
    }

    #[test]
    fn test_resolve_price_skips_lists_without_entry() {
        let high = make_list("high", 10);
        let low = make_list("low", 5);
        let low_id = low.id;
        let product = ProductId::new();

        let ranked = applicable_price_lists(vec![high, low], &ctx());
        let resolved = resolve_price(product, dec!(100), &ranked, |list_id, _| {
            (list_id == low_id).then_some(dec!(70))
        });

        assert_eq!(resolved.price, dec!(70));
        assert_eq!(resolved.price_list_id, Some(low_id));
    }

    #[test]
    fn test_resolve_price_falls_back_to_base_price() {
        let ranked = applicable_price_lists(vec![make_list("a", 1)], &ctx());
        let resolved = resolve_price(ProductId::new(), dec!(42.50), &ranked, |_, _| None);

        assert_eq!(resolved.price, dec!(42.50));
        assert_eq!(resolved.price_list_id, None);
        assert!(resolved.allow_non_listed);
        assert!(!resolved.warn_non_listed);
        assert_eq!(resolved.original_price, dec!(42.50));
    }
}
