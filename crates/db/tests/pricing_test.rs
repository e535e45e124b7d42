//! Integration tests for price resolution against stored lists: ranking,
//! validity windows, branch scope, and customer group eligibility.

mod common;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use uuid::Uuid;

use vendra_db::entities::{
    customer_group_members, customer_groups, price_list_branches, price_list_customer_groups,
    price_list_entries, price_lists,
};
use vendra_db::repositories::PricingRepository;
use vendra_shared::types::{PriceListId, ProductId};

use common::{seed_basic, test_db, today};

struct ListSpec {
    name: &'static str,
    is_global: bool,
    priority: i32,
}

async fn insert_list(db: &DatabaseConnection, spec: ListSpec) -> PriceListId {
    let id = PriceListId::new();
    price_lists::ActiveModel {
        id: Set(id.into_inner()),
        name: Set(spec.name.to_string()),
        active: Set(true),
        is_global: Set(spec.is_global),
        start_date: Set(None),
        end_date: Set(None),
        priority: Set(spec.priority),
        allow_non_listed: Set(true),
        warn_non_listed: Set(false),
        apply_all_customer_groups: Set(false),
        apply_all_users: Set(false),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert price list");
    id
}

async fn insert_entry(
    db: &DatabaseConnection,
    list_id: PriceListId,
    product_id: ProductId,
    price: Decimal,
) {
    price_list_entries::ActiveModel {
        id: Set(Uuid::now_v7()),
        price_list_id: Set(list_id.into_inner()),
        product_id: Set(product_id.into_inner()),
        price: Set(price),
        active: Set(true),
    }
    .insert(db)
    .await
    .expect("insert entry");
}

#[tokio::test]
async fn test_highest_priority_list_wins() {
    let db = test_db().await;
    let fixture = seed_basic(&db).await;
    let repo = PricingRepository::new(db.clone());

    let low = insert_list(&db, ListSpec { name: "Standard", is_global: true, priority: 1 }).await;
    let high = insert_list(&db, ListSpec { name: "Promo", is_global: true, priority: 9 }).await;
    insert_entry(&db, low, fixture.product_id, dec!(95)).await;
    insert_entry(&db, high, fixture.product_id, dec!(85)).await;

    let resolved = repo
        .resolve(fixture.product_id, None, None, None, today())
        .await
        .expect("resolve");

    assert_eq!(resolved.price, dec!(85));
    assert_eq!(resolved.price_list_id, Some(high));
    assert_eq!(resolved.original_price, dec!(100));
}

#[tokio::test]
async fn test_missing_entry_falls_through_to_lower_list() {
    let db = test_db().await;
    let fixture = seed_basic(&db).await;
    let repo = PricingRepository::new(db.clone());

    let low = insert_list(&db, ListSpec { name: "Standard", is_global: true, priority: 1 }).await;
    insert_list(&db, ListSpec { name: "Promo", is_global: true, priority: 9 }).await;
    insert_entry(&db, low, fixture.product_id, dec!(95)).await;

    let resolved = repo
        .resolve(fixture.product_id, None, None, None, today())
        .await
        .expect("resolve");

    assert_eq!(resolved.price, dec!(95));
    assert_eq!(resolved.price_list_id, Some(low));
}

#[tokio::test]
async fn test_no_entry_anywhere_falls_back_to_base_price() {
    let db = test_db().await;
    let fixture = seed_basic(&db).await;
    let repo = PricingRepository::new(db.clone());

    insert_list(&db, ListSpec { name: "Promo", is_global: true, priority: 9 }).await;

    let resolved = repo
        .resolve(fixture.other_product_id, None, None, None, today())
        .await
        .expect("resolve");

    assert_eq!(resolved.price, dec!(50));
    assert_eq!(resolved.price_list_id, None);
    assert!(resolved.allow_non_listed);
    assert!(!resolved.warn_non_listed);
}

#[tokio::test]
async fn test_expired_list_is_ignored() {
    let db = test_db().await;
    let fixture = seed_basic(&db).await;
    let repo = PricingRepository::new(db.clone());

    let expired = PriceListId::new();
    price_lists::ActiveModel {
        id: Set(expired.into_inner()),
        name: Set("Last Season".to_string()),
        active: Set(true),
        is_global: Set(true),
        start_date: Set(chrono::NaiveDate::from_ymd_opt(2026, 1, 1)),
        end_date: Set(chrono::NaiveDate::from_ymd_opt(2026, 3, 31)),
        priority: Set(9),
        allow_non_listed: Set(true),
        warn_non_listed: Set(false),
        apply_all_customer_groups: Set(false),
        apply_all_users: Set(false),
        created_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("insert expired list");
    insert_entry(&db, expired, fixture.product_id, dec!(10)).await;

    let resolved = repo
        .resolve(fixture.product_id, None, None, None, today())
        .await
        .expect("resolve");

    assert_eq!(resolved.price, dec!(100));
    assert_eq!(resolved.price_list_id, None);
}

#[tokio::test]
async fn test_branch_scoped_list_requires_matching_branch() {
    let db = test_db().await;
    let fixture = seed_basic(&db).await;
    let repo = PricingRepository::new(db.clone());

    let scoped = insert_list(&db, ListSpec { name: "Main Only", is_global: false, priority: 5 }).await;
    price_list_branches::ActiveModel {
        price_list_id: Set(scoped.into_inner()),
        branch_id: Set(fixture.branch_id.into_inner()),
    }
    .insert(&db)
    .await
    .expect("insert branch scope");
    insert_entry(&db, scoped, fixture.product_id, dec!(90)).await;

    let at_main = repo
        .resolve(fixture.product_id, Some(fixture.branch_id), None, None, today())
        .await
        .expect("resolve at main");
    assert_eq!(at_main.price, dec!(90));

    let elsewhere = repo
        .resolve(fixture.product_id, Some(fixture.other_branch_id), None, None, today())
        .await
        .expect("resolve elsewhere");
    assert_eq!(elsewhere.price, dec!(100));

    // No branch in the context at all: the scoped list does not match.
    let unbranched = repo
        .resolve(fixture.product_id, None, None, None, today())
        .await
        .expect("resolve without branch");
    assert_eq!(unbranched.price, dec!(100));
}

#[tokio::test]
async fn test_group_scoped_list_requires_membership() {
    let db = test_db().await;
    let fixture = seed_basic(&db).await;
    let repo = PricingRepository::new(db.clone());

    let group_id = Uuid::now_v7();
    customer_groups::ActiveModel {
        id: Set(group_id),
        name: Set("Wholesale".to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("insert group");
    customer_group_members::ActiveModel {
        customer_group_id: Set(group_id),
        counterparty_id: Set(fixture.customer_id.into_inner()),
    }
    .insert(&db)
    .await
    .expect("insert membership");

    let scoped = insert_list(&db, ListSpec { name: "Wholesale", is_global: false, priority: 5 }).await;
    price_list_customer_groups::ActiveModel {
        price_list_id: Set(scoped.into_inner()),
        customer_group_id: Set(group_id),
    }
    .insert(&db)
    .await
    .expect("insert group scope");
    insert_entry(&db, scoped, fixture.product_id, dec!(80)).await;

    let member = repo
        .resolve(fixture.product_id, None, Some(fixture.customer_id), None, today())
        .await
        .expect("resolve for member");
    assert_eq!(member.price, dec!(80));

    // The supplier belongs to no group, so the scoped list does not apply.
    let outsider = repo
        .resolve(fixture.product_id, None, Some(fixture.supplier_id), None, today())
        .await
        .expect("resolve for outsider");
    assert_eq!(outsider.price, dec!(100));
}

#[tokio::test]
async fn test_applicable_lists_are_ranked() {
    let db = test_db().await;
    let fixture = seed_basic(&db).await;
    let repo = PricingRepository::new(db.clone());

    insert_list(&db, ListSpec { name: "Standard", is_global: true, priority: 1 }).await;
    insert_list(&db, ListSpec { name: "Promo", is_global: true, priority: 9 }).await;
    insert_list(&db, ListSpec { name: "Seasonal", is_global: true, priority: 5 }).await;

    let ranked = repo
        .applicable_lists(Some(fixture.branch_id), None, None, today())
        .await
        .expect("applicable lists");

    let names: Vec<&str> = ranked.iter().map(|list| list.name.as_str()).collect();
    assert_eq!(names, ["Promo", "Seasonal", "Standard"]);
}
