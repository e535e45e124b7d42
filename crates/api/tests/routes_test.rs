//! HTTP-level tests: routing, JSON shapes, and error status mapping.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use vendra_api::{AppState, create_router};
use vendra_db::entities::{branches, counterparties, products, sea_orm_active_enums::CounterpartyKind, users};
use vendra_db::migration::{Migrator, MigratorTrait};

struct TestApp {
    router: Router,
    branch_id: Uuid,
    user_id: Uuid,
    customer_id: Uuid,
    product_id: Uuid,
}

/// Boots the full router against a migrated in-memory SQLite database with a
/// minimal fixture graph.
async fn test_app() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db: DatabaseConnection = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    let now = Utc::now();
    let branch_id = Uuid::now_v7();
    branches::ActiveModel {
        id: Set(branch_id),
        name: Set("Main".to_string()),
        active: Set(true),
        created_at: Set(now),
    }
    .insert(&db)
    .await
    .expect("insert branch");

    let user_id = Uuid::now_v7();
    users::ActiveModel {
        id: Set(user_id),
        display_name: Set("Clerk".to_string()),
        active: Set(true),
        created_at: Set(now),
    }
    .insert(&db)
    .await
    .expect("insert user");

    let customer_id = Uuid::now_v7();
    counterparties::ActiveModel {
        id: Set(customer_id),
        kind: Set(CounterpartyKind::Customer),
        name: Set("Acme Retail".to_string()),
        total_purchased: Set(dec!(0)),
        total_debt: Set(dec!(0)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await
    .expect("insert customer");

    let product_id = Uuid::now_v7();
    products::ActiveModel {
        id: Set(product_id),
        code: Set("SKU-100".to_string()),
        name: Set("Widget".to_string()),
        base_price: Set(dec!(100)),
        category: Set(None),
        active: Set(true),
        created_at: Set(now),
    }
    .insert(&db)
    .await
    .expect("insert product");

    let router = create_router(AppState {
        db: Arc::new(db),
        conflict_retries: 3,
    });

    TestApp {
        router,
        branch_id,
        user_id,
        customer_id,
        product_id,
    }
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse JSON body")
    };
    (status, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn put_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

fn order_payload(app: &TestApp, quantity: &str) -> Value {
    json!({
        "kind": "sales_order",
        "counterparty_id": app.customer_id,
        "branch_id": app.branch_id,
        "created_by": app.user_id,
        "document_date": "2026-06-15",
        "lines": [
            { "product_id": app.product_id, "quantity": quantity }
        ]
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app().await;
    let (status, body) = send(app.router, get("/api/v1/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_and_fetch_document() {
    let app = test_app().await;

    let (status, body) = send(
        app.router.clone(),
        post_json("/api/v1/documents", &order_payload(&app, "3")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], "SO-20260615-0001");
    assert_eq!(body["status"], "open");
    assert_eq!(body["warnings"], json!([]));
    assert_eq!(body["payment_status"], "unpaid");
    assert_eq!(body["lines"].as_array().map(Vec::len), Some(1));

    let id = body["id"].as_str().expect("document id").to_string();
    let (status, fetched) = send(app.router, get(&format!("/api/v1/documents/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["code"], "SO-20260615-0001");
}

#[tokio::test]
async fn test_missing_document_maps_to_404() {
    let app = test_app().await;
    let (status, body) = send(
        app.router,
        get(&format!("/api/v1/documents/{}", Uuid::now_v7())),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_empty_lines_map_to_400() {
    let app = test_app().await;
    let mut payload = order_payload(&app, "1");
    payload["lines"] = json!([]);

    let (status, body) = send(app.router, post_json("/api/v1/documents", &payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
}

#[tokio::test]
async fn test_invalid_transition_maps_to_422() {
    let app = test_app().await;

    let (status, created) = send(
        app.router.clone(),
        post_json("/api/v1/documents", &order_payload(&app, "1")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().expect("document id").to_string();

    // Sales documents have no open -> open self-transition.
    let (status, body) = send(
        app.router,
        put_json(
            &format!("/api/v1/documents/{id}/status"),
            &json!({ "status": "open" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "business_rule");
}

#[tokio::test]
async fn test_payment_flow_over_http() {
    let app = test_app().await;

    let (_, created) = send(
        app.router.clone(),
        post_json("/api/v1/documents", &order_payload(&app, "2")),
    )
    .await;
    let id = created["id"].as_str().expect("document id").to_string();

    let (status, paid) = send(
        app.router.clone(),
        post_json(
            &format!("/api/v1/documents/{id}/payments"),
            &json!({
                "amount": "200",
                "paid_on": "2026-06-15",
                "method": "cash",
                "recorded_by": app.user_id
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(paid["debt_amount"], "0");
    assert_eq!(paid["payment_status"], "paid");
    assert_eq!(paid["payments"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_price_resolution_endpoint() {
    let app = test_app().await;

    let (status, body) = send(
        app.router,
        get(&format!(
            "/api/v1/pricing/resolve?product_id={}&date=2026-06-15",
            app.product_id
        )),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "100");
    assert_eq!(body["price_list_id"], Value::Null);
}
