use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use product_service::{
    app::product::{
        handler::{AppState, GREETING},
        repository::{MemoryProductRepository, ProductRepository},
        seed,
    },
    core::router::build_app,
    infrastructure::config::AppConfig,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app(seeded: bool) -> Router {
    let repository: Arc<dyn ProductRepository> = Arc::new(MemoryProductRepository::new());
    if seeded {
        seed::initialize(repository.as_ref()).await.unwrap();
    }
    build_app(AppState::new(repository), &AppConfig::default()).unwrap()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}

fn desk() -> Value {
    json!({
        "name": "Desk",
        "description": "Standing desk",
        "price": 349.5,
        "quantity": 3
    })
}

#[tokio::test]
async fn test_greeting() {
    let app = test_app(false).await;
    let (status, headers, body) = send(&app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(GREETING));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app(false).await;
    let (status, _, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_list_empty_store() {
    let app = test_app(false).await;
    let (status, _, body) = send(&app, Method::GET, "/products", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_seeded_products() {
    let app = test_app(true).await;
    let (status, _, body) = send(&app, Method::GET, "/products", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Laptop", "Mouse", "Keyboard", "Monitor"]);

    let (status, _, laptop) = send(&app, Method::GET, "/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        laptop,
        json!({
            "id": 1,
            "name": "Laptop",
            "description": "A high-performance laptop",
            "price": 999.99,
            "quantity": 10
        })
    );
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = test_app(true).await;

    let mut payload = desk();
    payload["id"] = json!(1);
    let (status, _, created) = send(&app, Method::POST, "/products", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    // 客户端提供的 id 被忽略，新 id 不与初始数据冲突
    assert_eq!(id, 5);

    let (status, _, fetched) = send(&app, Method::GET, &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = desk();
    expected["id"] = json!(id);
    assert_eq!(fetched, expected);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_created_ids_are_unique() {
    let app = test_app(false).await;
    let mut ids = Vec::new();

    for _ in 0..5 {
        let (_, _, created) = send(&app, Method::POST, "/products", Some(desk())).await;
        ids.push(created["id"].as_i64().unwrap());
    }

    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len());
}

#[tokio::test]
async fn test_update_replaces_all_fields() {
    let app = test_app(true).await;

    let replacement = json!({
        "id": 99,
        "name": "Gaming Mouse",
        "price": 59.99,
        "quantity": 7
    });
    let (status, _, updated) = send(&app, Method::PUT, "/products/2", Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);

    let expected = json!({
        "id": 2,
        "name": "Gaming Mouse",
        "description": null,
        "price": 59.99,
        "quantity": 7
    });
    assert_eq!(updated, expected);

    let (_, _, fetched) = send(&app, Method::GET, "/products/2", None).await;
    assert_eq!(fetched, expected);

    let (_, _, missing) = send(&app, Method::GET, "/products/99", None).await;
    assert_eq!(missing, json!({ "error": "Product not found" }));
}

#[tokio::test]
async fn test_delete_is_terminal() {
    let app = test_app(true).await;

    let (status, _, body) = send(&app, Method::DELETE, "/products/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Product deleted successfully" }));

    let not_found = json!({ "error": "Product not found" });

    let (status, _, body) = send(&app, Method::GET, "/products/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found);

    let (status, _, body) = send(&app, Method::PUT, "/products/3", Some(desk())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found);

    let (status, _, body) = send(&app, Method::DELETE, "/products/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, not_found);

    let (_, _, list) = send(&app, Method::GET, "/products", None).await;
    assert!(list.as_array().unwrap().iter().all(|p| p["id"] != json!(3)));
    assert_eq!(list.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_never_created_id_is_not_found() {
    let app = test_app(false).await;

    let (status, _, body) = send(&app, Method::GET, "/products/12345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Product not found" }));
}

#[tokio::test]
async fn test_malformed_id_is_json_bad_request() {
    let app = test_app(true).await;

    for uri in ["/products/99999999999", "/products/abc"] {
        let (status, _, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    let (status, _, body) = send(&app, Method::PUT, "/products/abc", Some(desk())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _, body) = send(&app, Method::DELETE, "/products/-x", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, _, list) = send(&app, Method::GET, "/products", None).await;
    assert_eq!(list.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_missing_fields_rejected() {
    let app = test_app(false).await;

    let (status, _, body) =
        send(&app, Method::POST, "/products", Some(json!({ "name": "Desk" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, _, list) = send(&app, Method::GET, "/products", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_negative_values_rejected() {
    let app = test_app(true).await;

    let mut payload = desk();
    payload["price"] = json!(-1.0);
    let (status, _, body) = send(&app, Method::POST, "/products", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Price must not be negative");

    let mut payload = desk();
    payload["quantity"] = json!(-5);
    let (status, _, _) = send(&app, Method::PUT, "/products/1", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, laptop) = send(&app, Method::GET, "/products/1", None).await;
    assert_eq!(laptop["quantity"], 10);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = test_app(false).await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/products")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "DELETE");
}

#[tokio::test]
async fn test_cors_echoes_configured_origin_on_simple_request() {
    let app = test_app(false).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/products")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert!(headers
        .get_all(header::VARY)
        .iter()
        .any(|v| v.to_str().unwrap().contains("origin")));
}

#[tokio::test]
async fn test_cors_rejects_other_origin() {
    let app = test_app(false).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/products")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
