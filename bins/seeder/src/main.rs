//! Database seeder for Vendra development and testing.
//!
//! Seeds branches, a clerk user, a small product catalog, a customer group
//! with one member, and a wholesale price list for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;
use vendra_db::entities::{
    branches, counterparties, customer_group_members, customer_groups, price_list_entries,
    price_lists, products, sea_orm_active_enums::CounterpartyKind, users,
};

/// Main branch ID (consistent for all seeds)
const MAIN_BRANCH_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Warehouse branch ID (consistent for all seeds)
const WAREHOUSE_BRANCH_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Clerk user ID (consistent for all seeds)
const CLERK_USER_ID: &str = "00000000-0000-0000-0000-000000000003";
/// Wholesale customer group ID (consistent for all seeds)
const WHOLESALE_GROUP_ID: &str = "00000000-0000-0000-0000-000000000004";
/// Wholesale price list ID (consistent for all seeds)
const WHOLESALE_LIST_ID: &str = "00000000-0000-0000-0000-000000000005";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = vendra_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding branches...");
    seed_branches(&db).await;

    println!("Seeding clerk user...");
    seed_clerk(&db).await;

    println!("Seeding products...");
    seed_products(&db).await;

    println!("Seeding counterparties...");
    seed_counterparties(&db).await;

    println!("Seeding wholesale price list...");
    seed_price_list(&db).await;

    println!("Seeding complete!");
}

fn fixed_id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).expect("valid seed UUID")
}

/// Seeds the two development branches.
async fn seed_branches(db: &DatabaseConnection) {
    for (id, name) in [
        (MAIN_BRANCH_ID, "Main Store"),
        (WAREHOUSE_BRANCH_ID, "Warehouse"),
    ] {
        if branches::Entity::find_by_id(fixed_id(id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Branch {name} already exists, skipping...");
            continue;
        }

        let branch = branches::ActiveModel {
            id: Set(fixed_id(id)),
            name: Set(name.to_string()),
            active: Set(true),
            created_at: Set(Utc::now()),
        };
        if let Err(e) = branch.insert(db).await {
            eprintln!("Failed to insert branch {name}: {e}");
        } else {
            println!("  Created branch: {name}");
        }
    }
}

/// Seeds a clerk user for development.
async fn seed_clerk(db: &DatabaseConnection) {
    if users::Entity::find_by_id(fixed_id(CLERK_USER_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Clerk user already exists, skipping...");
        return;
    }

    let user = users::ActiveModel {
        id: Set(fixed_id(CLERK_USER_ID)),
        display_name: Set("Dev Clerk".to_string()),
        active: Set(true),
        created_at: Set(Utc::now()),
    };
    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert clerk user: {e}");
    } else {
        println!("  Created user: Dev Clerk");
    }
}

/// Seeds a small product catalog.
async fn seed_products(db: &DatabaseConnection) {
    let catalog = [
        ("SKU-0001", "Espresso Beans 1kg", "180.00", Some("coffee")),
        ("SKU-0002", "Filter Papers 100pk", "35.50", Some("supplies")),
        ("SKU-0003", "Ceramic Mug", "55.25", Some("merch")),
        ("SKU-0004", "Cold Brew Bottle", "95.00", None),
    ];

    for (code, name, price, category) in catalog {
        let exists = products::Entity::find()
            .all(db)
            .await
            .unwrap_or_default()
            .iter()
            .any(|product| product.code == code);
        if exists {
            println!("  Product {code} already exists, skipping...");
            continue;
        }

        let product = products::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            base_price: Set(price.parse::<Decimal>().expect("valid seed price")),
            category: Set(category.map(str::to_string)),
            active: Set(true),
            created_at: Set(Utc::now()),
        };
        if let Err(e) = product.insert(db).await {
            eprintln!("Failed to insert product {code}: {e}");
        } else {
            println!("  Created product: {code} {name}");
        }
    }
}

/// Seeds one customer (in the wholesale group) and one supplier.
async fn seed_counterparties(db: &DatabaseConnection) {
    let group = customer_groups::ActiveModel {
        id: Set(fixed_id(WHOLESALE_GROUP_ID)),
        name: Set("Wholesale".to_string()),
        created_at: Set(Utc::now()),
    };
    match customer_groups::Entity::find_by_id(fixed_id(WHOLESALE_GROUP_ID))
        .one(db)
        .await
        .ok()
        .flatten()
    {
        Some(_) => println!("  Wholesale group already exists, skipping..."),
        None => {
            if let Err(e) = group.insert(db).await {
                eprintln!("Failed to insert wholesale group: {e}");
            }
        }
    }

    let parties = [
        (CounterpartyKind::Customer, "Corner Cafe", true),
        (CounterpartyKind::Supplier, "Roastery Supply Co", false),
    ];

    for (kind, name, in_group) in parties {
        let exists = counterparties::Entity::find()
            .all(db)
            .await
            .unwrap_or_default()
            .iter()
            .any(|party| party.name == name);
        if exists {
            println!("  Counterparty {name} already exists, skipping...");
            continue;
        }

        let id = Uuid::now_v7();
        let party = counterparties::ActiveModel {
            id: Set(id),
            kind: Set(kind),
            name: Set(name.to_string()),
            total_purchased: Set(Decimal::ZERO),
            total_debt: Set(Decimal::ZERO),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
        };
        if let Err(e) = party.insert(db).await {
            eprintln!("Failed to insert counterparty {name}: {e}");
            continue;
        }
        println!("  Created counterparty: {name}");

        if in_group {
            let membership = customer_group_members::ActiveModel {
                customer_group_id: Set(fixed_id(WHOLESALE_GROUP_ID)),
                counterparty_id: Set(id),
            };
            if let Err(e) = membership.insert(db).await {
                eprintln!("Failed to add {name} to wholesale group: {e}");
            }
        }
    }
}

/// Seeds a wholesale price list covering the coffee products.
async fn seed_price_list(db: &DatabaseConnection) {
    if price_lists::Entity::find_by_id(fixed_id(WHOLESALE_LIST_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Wholesale price list already exists, skipping...");
        return;
    }

    let list = price_lists::ActiveModel {
        id: Set(fixed_id(WHOLESALE_LIST_ID)),
        name: Set("Wholesale".to_string()),
        active: Set(true),
        is_global: Set(false),
        start_date: Set(None),
        end_date: Set(None),
        priority: Set(10),
        allow_non_listed: Set(true),
        warn_non_listed: Set(true),
        apply_all_customer_groups: Set(false),
        apply_all_users: Set(false),
        created_at: Set(Utc::now()),
    };
    if let Err(e) = list.insert(db).await {
        eprintln!("Failed to insert wholesale price list: {e}");
        return;
    }
    println!("  Created price list: Wholesale");

    // Scope the list to the wholesale customer group.
    let scope = vendra_db::entities::price_list_customer_groups::ActiveModel {
        price_list_id: Set(fixed_id(WHOLESALE_LIST_ID)),
        customer_group_id: Set(fixed_id(WHOLESALE_GROUP_ID)),
    };
    if let Err(e) = scope.insert(db).await {
        eprintln!("Failed to scope wholesale price list: {e}");
    }

    // Discounted entries for the coffee products only.
    let discounted = [("SKU-0001", "155.00"), ("SKU-0002", "29.75")];
    let products = products::Entity::find().all(db).await.unwrap_or_default();
    for (code, price) in discounted {
        let Some(product) = products.iter().find(|product| product.code == code) else {
            eprintln!("Product {code} missing, skipping entry...");
            continue;
        };
        let entry = price_list_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            price_list_id: Set(fixed_id(WHOLESALE_LIST_ID)),
            product_id: Set(product.id),
            price: Set(price.parse::<Decimal>().expect("valid seed price")),
            active: Set(true),
        };
        if let Err(e) = entry.insert(db).await {
            eprintln!("Failed to insert entry for {code}: {e}");
        } else {
            println!("  Created wholesale price for {code}");
        }
    }
}
