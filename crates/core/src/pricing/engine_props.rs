//! Property-based tests for the price resolution engine.
//!
//! - Determinism: identical context and catalog state always rank and resolve
//!   identically.
//! - Ordering: the ranked output is sorted by priority descending.
//! - Date windows: a list whose window excludes the effective date never
//!   appears in the ranked output.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::{applicable_price_lists, resolve_price};
use super::types::{PriceListInfo, PricingContext};
use vendra_shared::types::{PriceListId, ProductId};

/// Strategy for priorities.
fn priority() -> impl Strategy<Value = i32> {
    -10i32..100i32
}

/// Strategy for a global, always-active price list with a random priority and
/// creation offset.
fn global_list() -> impl Strategy<Value = PriceListInfo> {
    (priority(), 0i64..10_000i64).prop_map(|(priority, created_offset_secs)| PriceListInfo {
        id: PriceListId::new(),
        name: format!("list-p{priority}"),
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
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
            + Duration::seconds(created_offset_secs),
    })
}

fn ctx() -> PricingContext {
    PricingContext::on(NaiveDate::from_ymd_opt(2026, 6, 15).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Ranking is ordered by priority descending.
    #[test]
    fn prop_ranked_by_priority_descending(lists in prop::collection::vec(global_list(), 0..12)) {
        let ranked = applicable_price_lists(lists, &ctx());
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].priority >= pair[1].priority);
        }
    }

    /// Ranking twice over the same input yields the same order.
    #[test]
    fn prop_ranking_is_deterministic(lists in prop::collection::vec(global_list(), 0..12)) {
        let first = applicable_price_lists(lists.clone(), &ctx());
        let second = applicable_price_lists(lists, &ctx());
        let first_ids: Vec<_> = first.iter().map(|l| l.id).collect();
        let second_ids: Vec<_> = second.iter().map(|l| l.id).collect();
        prop_assert_eq!(first_ids, second_ids);
    }

    /// Resolution twice with the same entry table yields the same price.
    #[test]
    fn prop_resolution_is_deterministic(
        lists in prop::collection::vec(global_list(), 1..8),
        cents in 1i64..1_000_000i64,
    ) {
        let ranked = applicable_price_lists(lists, &ctx());
        let product = ProductId::new();
        let base = Decimal::new(cents, 2);
        // Every list carries the product at a price derived from its priority.
        let lookup = |list_id: PriceListId, _p: ProductId| {
            ranked
                .iter()
                .find(|l| l.id == list_id)
                .map(|l| Decimal::from(l.priority.unsigned_abs()))
        };

        let first = resolve_price(product, base, &ranked, lookup);
        let second = resolve_price(product, base, &ranked, lookup);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.original_price, base);
    }

    /// A list whose window has already ended is never applicable.
    #[test]
    fn prop_expired_window_excluded(
        lists in prop::collection::vec(global_list(), 1..8),
        days_back in 1i64..400i64,
    ) {
        let context = ctx();
        let mut lists = lists;
        let expired_id = lists[0].id;
        lists[0].end_date = Some(context.effective_date - Duration::days(days_back));

        let ranked = applicable_price_lists(lists, &context);
        prop_assert!(ranked.iter().all(|l| l.id != expired_id));
    }

    /// The resolved price comes from the first ranked list that has an entry.
    #[test]
    fn prop_first_entry_wins(lists in prop::collection::vec(global_list(), 1..8)) {
        let ranked = applicable_price_lists(lists, &ctx());
        let product = ProductId::new();
        let expected = ranked.first().map(|l| l.id);

        let resolved = resolve_price(product, Decimal::ONE_HUNDRED, &ranked, |_, _| {
            Some(Decimal::TEN)
        });
        prop_assert_eq!(resolved.price_list_id, expected);
    }
}
