//! End-to-end API flow through the in-process router.
//! Run: cargo test -p comanda-server --test api_flow

use axum::body::Body;
use comanda_server::auth::JwtConfig;
use comanda_server::services::HttpService;
use comanda_server::{Config, ServerState};
use serde_json::{Value, json};

async fn test_service() -> HttpService {
    let mut config = Config::with_overrides("/tmp/comanda-test", 0);
    config.jwt = JwtConfig {
        secret: "api-flow-test-secret-key-of-sufficient-length".to_string(),
        expiration_minutes: 60,
        refresh_expiration_minutes: 120,
        issuer: "comanda-server".to_string(),
        audience: "comanda-clients".to_string(),
    };

    let state = ServerState::initialize_in_memory(&config)
        .await
        .expect("initialize state");

    let http = HttpService::new(config);
    http.initialize(state);
    http
}

async fn request(
    http: &HttpService,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (u16, Value) {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = http.oneshot(request).await.expect("oneshot");
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse body")
    };
    (status, value)
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let http = test_service().await;

    let (status, body) = request(&http, "GET", "/api/foods", None, None).await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], "E3001");

    let (status, _) = request(&http, "GET", "/api/health", None, None).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn signup_rejects_duplicate_email() {
    let http = test_service().await;

    let payload = json!({
        "first_name": "Ana",
        "last_name": "Garcia",
        "email": "ana@example.com",
        "phone": "600111222",
        "password": "secret-password"
    });

    let (status, _) = request(&http, "POST", "/api/users/signup", None, Some(payload.clone())).await;
    assert_eq!(status, 200);

    let (status, body) = request(&http, "POST", "/api/users/signup", None, Some(payload)).await;
    assert_eq!(status, 409);
    assert_eq!(body["code"], "E0004");
}

#[tokio::test]
async fn full_billing_flow() {
    let http = test_service().await;

    // Signup issues a token pair
    let (status, signup) = request(
        &http,
        "POST",
        "/api/users/signup",
        None,
        Some(json!({
            "first_name": "Ana",
            "last_name": "Garcia",
            "email": "ana@example.com",
            "phone": "600111222",
            "password": "secret-password"
        })),
    )
    .await;
    assert_eq!(status, 200);
    assert!(signup["refresh_token"].is_string());

    // Login issues a fresh pair
    let (status, login) = request(
        &http,
        "POST",
        "/api/users/login",
        None,
        Some(json!({
            "email": "ana@example.com",
            "password": "secret-password"
        })),
    )
    .await;
    assert_eq!(status, 200);
    let token = login["token"].as_str().expect("token").to_string();
    let token = Some(token.as_str());

    // Seed catalog: menu -> foods
    let (status, menu) = request(
        &http,
        "POST",
        "/api/menus",
        token,
        Some(json!({"name": "Carta", "category": "main"})),
    )
    .await;
    assert_eq!(status, 200);
    let menu_id = menu["id"].as_str().expect("menu id");

    let (status, paella) = request(
        &http,
        "POST",
        "/api/foods",
        token,
        Some(json!({
            "name": "paella",
            "price": 10.0,
            "food_image": "/images/paella.webp",
            "menu": menu_id
        })),
    )
    .await;
    assert_eq!(status, 200);
    let paella_id = paella["id"].as_str().expect("food id");

    let (status, sangria) = request(
        &http,
        "POST",
        "/api/foods",
        token,
        Some(json!({
            "name": "sangria",
            "price": 5.504,
            "food_image": "/images/sangria.webp",
            "menu": menu_id
        })),
    )
    .await;
    assert_eq!(status, 200);
    // Prices are rounded to 2 decimals on write
    assert_eq!(sangria["price"], 5.5);
    let sangria_id = sangria["id"].as_str().expect("food id");

    // Table for the order
    let (status, table) = request(
        &http,
        "POST",
        "/api/tables",
        token,
        Some(json!({"table_number": 12, "number_of_guests": 4})),
    )
    .await;
    assert_eq!(status, 200);
    let table_id = table["id"].as_str().expect("table id");

    // Order-item pack creates the order and its lines in one call
    let (status, pack) = request(
        &http,
        "POST",
        "/api/order-items",
        token,
        Some(json!({
            "table": table_id,
            "order_items": [
                {"food": paella_id, "quantity": 2, "unit_price": 10.0},
                {"food": sangria_id, "quantity": 1, "unit_price": 5.5}
            ]
        })),
    )
    .await;
    assert_eq!(status, 200);
    let order_id = pack["order"]["id"].as_str().expect("order id");
    assert_eq!(pack["order_items"].as_array().map(Vec::len), Some(2));

    // The composed order view
    let (status, view) = request(
        &http,
        "GET",
        &format!("/api/orders/{order_id}/items"),
        token,
        None,
    )
    .await;
    assert_eq!(status, 200);
    let groups = view.as_array().expect("groups");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["table_number"], 12);
    assert_eq!(groups[0]["total_count"], 2);
    assert_eq!(groups[0]["payment_due"], 15.5);
    assert_eq!(groups[0]["order_items"].as_array().map(Vec::len), Some(2));

    // Invoice over the same order
    let (status, invoice) = request(
        &http,
        "POST",
        "/api/invoices",
        token,
        Some(json!({"order": order_id, "payment_method": "CARD"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(invoice["payment_status"], "PENDING");
    let invoice_id = invoice["id"].as_str().expect("invoice id");

    let (status, invoice_view) = request(
        &http,
        "GET",
        &format!("/api/invoices/{invoice_id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(invoice_view["payment_due"], 15.5);
    assert_eq!(invoice_view["table_number"], 12);
    assert_eq!(invoice_view["order_id"], order_id);
    assert_eq!(invoice_view["order_details"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn empty_order_view_is_empty_list_and_invoice_view_is_404() {
    let http = test_service().await;

    let (_, signup) = request(
        &http,
        "POST",
        "/api/users/signup",
        None,
        Some(json!({
            "first_name": "Ana",
            "last_name": "Garcia",
            "email": "ana2@example.com",
            "phone": "600333444",
            "password": "secret-password"
        })),
    )
    .await;
    let token = signup["token"].as_str().expect("token").to_string();
    let token = Some(token.as_str());

    // An order with no items
    let (status, order) = request(
        &http,
        "POST",
        "/api/orders",
        token,
        Some(json!({"order_date": "2026-08-08T12:00:00Z"})),
    )
    .await;
    assert_eq!(status, 200);
    let order_id = order["id"].as_str().expect("order id");

    let (status, view) = request(
        &http,
        "GET",
        &format!("/api/orders/{order_id}/items"),
        token,
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(view.as_array().map(Vec::len), Some(0));

    // The invoice view must refuse to index into the empty result
    let (status, invoice) = request(
        &http,
        "POST",
        "/api/invoices",
        token,
        Some(json!({"order": order_id})),
    )
    .await;
    assert_eq!(status, 200);
    let invoice_id = invoice["id"].as_str().expect("invoice id");

    let (status, body) = request(
        &http,
        "GET",
        &format!("/api/invoices/{invoice_id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], "E0003");
}
