//! HTTP API driven in-process through the fully layered router
//! Run: cargo test -p catalog-server --test category_api

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use catalog_server::db::{CategoryStore, MemoryStore};
use catalog_server::routes::build_app;
use catalog_server::{CategoryService, Config, ServerState, StoreBackend};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::{Category, Product};
use tower::ServiceExt;

async fn app_with(categories: Vec<Category>, products: Vec<Product>) -> Router {
    let store = Arc::new(MemoryStore::with_products(products));
    for category in categories {
        store.insert(category).await.unwrap();
    }
    let config = Config::with_overrides("./target/test-data", 0, StoreBackend::Memory);
    let state = ServerState::new(config, CategoryService::new(store.clone(), store));
    build_app(state)
}

fn wood_oak_tables() -> Vec<Category> {
    vec![
        Category::new(1, "Wood", "wood"),
        Category::new(2, "Oak", "oak").with_parent(1),
        Category::new(3, "Tables", "tables").with_parent(2),
    ]
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_backend() {
    let app = app_with(vec![], vec![]).await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");

    let (status, body) = send(&app, Method::GET, "/health/detailed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["store"]["status"], "ok");
}

#[tokio::test]
async fn create_then_fetch_by_id_and_slug() {
    let app = app_with(vec![], vec![]).await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({ "name": "Modern Oak Table!", "seo_keywords": ["oak"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "modern-oak-table");
    assert_eq!(created["visibility"], "public");

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/api/categories/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Modern Oak Table!");

    let (status, by_slug) =
        send(&app, Method::GET, "/api/categories/slug/modern-oak-table", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_slug["id"].as_i64(), Some(id));

    let (_, second) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({ "name": "Modern Oak Table" })),
    )
    .await;
    assert_eq!(second["slug"], "modern-oak-table-1");
}

#[tokio::test]
async fn validation_errors_list_fields() {
    let app = app_with(vec![], vec![]).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({ "name": "", "slug": "Not A Slug", "sort_order": -2 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    let fields: Vec<&str> = body["details"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"slug"));
    assert!(fields.contains(&"sort_order"));
}

#[tokio::test]
async fn delete_parent_is_conflict() {
    let app = app_with(wood_oak_tables(), vec![]).await;

    let (status, body) = send(&app, Method::DELETE, "/api/categories/1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1004);
    assert_eq!(body["details"]["children"], 1);

    let (status, _) = send(&app, Method::DELETE, "/api/categories/3", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/categories/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn circular_parent_is_rejected() {
    let app = app_with(wood_oak_tables(), vec![]).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/categories/1",
        Some(json!({ "parent_category": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 1003);
    assert_eq!(body["details"]["chain"], json!([3, 2, 1]));

    // explicit null detaches
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/categories/2",
        Some(json!({ "parent_category": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["parent_category"].is_null());
}

#[tokio::test]
async fn tree_path_and_counts() {
    let products = vec![
        Product::new(10, "Chair", "2"),
        Product::new(11, "Desk", "3"),
        Product::new(12, "Bench", "tables"),
    ];
    let app = app_with(wood_oak_tables(), products).await;

    let (status, path) = send(&app, Method::GET, "/api/categories/3/path", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(path, json!(["Wood", "Oak", "Tables"]));

    let (_, count) = send(&app, Method::GET, "/api/categories/1/product-count", None).await;
    assert_eq!(count["product_count"], 3);

    let (status, tree) = send(&app, Method::GET, "/api/categories/tree", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tree[0]["name"], "Wood");
    assert_eq!(tree[0]["level"], 0);
    assert_eq!(tree[0]["product_count"], 3);
    assert_eq!(tree[0]["children"][0]["children"][0]["level"], 2);

    let (_, listed) = send(&app, Method::GET, "/api/categories?with_counts=true", None).await;
    let oak = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["slug"] == "oak")
        .unwrap();
    assert_eq!(oak["product_count"], 3);
}

#[tokio::test]
async fn batch_sort_order_and_listing_order() {
    let app = app_with(wood_oak_tables(), vec![]).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/categories/sort-order",
        Some(json!([{ "id": 3, "sort_order": 2 }, { "id": 2, "sort_order": 1 }])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (_, listed) = send(&app, Method::GET, "/api/categories", None).await;
    let slugs: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["slug"].as_str())
        .collect();
    assert_eq!(slugs, vec!["wood", "oak", "tables"]);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = app_with(vec![], vec![]).await;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
