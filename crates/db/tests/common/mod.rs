//! Shared fixtures: a migrated in-memory SQLite database plus a small
//! catalog to hang documents and transfers off.

// Not every test binary uses every helper.
#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection, EntityTrait,
};

use vendra_db::entities::{
    branches, counterparties, inventory, products, sea_orm_active_enums::CounterpartyKind, users,
};
use vendra_db::migration::{Migrator, MigratorTrait};
use vendra_shared::types::{BranchId, CounterpartyId, ProductId, UserId};

/// Connects to a fresh in-memory SQLite database and runs all migrations.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// The standard fixture graph used across the integration suites.
pub struct Fixture {
    pub branch_id: BranchId,
    pub other_branch_id: BranchId,
    pub user_id: UserId,
    pub customer_id: CounterpartyId,
    pub supplier_id: CounterpartyId,
    /// Base price 100.
    pub product_id: ProductId,
    /// Base price 50.
    pub other_product_id: ProductId,
}

/// A date inside every fixture's validity windows.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).expect("valid date")
}

/// Seeds two branches, a user, a customer, a supplier, and two products.
pub async fn seed_basic(db: &DatabaseConnection) -> Fixture {
    let now = Utc::now();

    let branch_id = BranchId::new();
    let other_branch_id = BranchId::new();
    for (id, name) in [(branch_id, "Main"), (other_branch_id, "Warehouse")] {
        branches::ActiveModel {
            id: Set(id.into_inner()),
            name: Set(name.to_string()),
            active: Set(true),
            created_at: Set(now),
        }
        .insert(db)
        .await
        .expect("insert branch");
    }

    let user_id = UserId::new();
    users::ActiveModel {
        id: Set(user_id.into_inner()),
        display_name: Set("Clerk".to_string()),
        active: Set(true),
        created_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert user");

    let customer_id = CounterpartyId::new();
    let supplier_id = CounterpartyId::new();
    for (id, kind, name) in [
        (customer_id, CounterpartyKind::Customer, "Acme Retail"),
        (supplier_id, CounterpartyKind::Supplier, "Bulk Goods Co"),
    ] {
        counterparties::ActiveModel {
            id: Set(id.into_inner()),
            kind: Set(kind),
            name: Set(name.to_string()),
            total_purchased: Set(Decimal::ZERO),
            total_debt: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("insert counterparty");
    }

    let product_id = ProductId::new();
    let other_product_id = ProductId::new();
    for (id, code, name, price) in [
        (product_id, "SKU-100", "Widget", dec!(100)),
        (other_product_id, "SKU-050", "Gadget", dec!(50)),
    ] {
        products::ActiveModel {
            id: Set(id.into_inner()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            base_price: Set(price),
            category: Set(None),
            active: Set(true),
            created_at: Set(now),
        }
        .insert(db)
        .await
        .expect("insert product");
    }

    Fixture {
        branch_id,
        other_branch_id,
        user_id,
        customer_id,
        supplier_id,
        product_id,
        other_product_id,
    }
}

/// Reads `on_hand` for a (product, branch) pair, zero when no row exists.
pub async fn on_hand(db: &DatabaseConnection, product_id: ProductId, branch_id: BranchId) -> Decimal {
    inventory::Entity::find_by_id((product_id.into_inner(), branch_id.into_inner()))
        .one(db)
        .await
        .expect("query inventory")
        .map_or(Decimal::ZERO, |level| level.on_hand)
}

/// Reloads a counterparty row.
pub async fn counterparty(db: &DatabaseConnection, id: CounterpartyId) -> counterparties::Model {
    counterparties::Entity::find_by_id(id.into_inner())
        .one(db)
        .await
        .expect("query counterparty")
        .expect("counterparty exists")
}
