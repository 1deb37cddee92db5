//! Integration tests for the shopping cart.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p stride-api)
//! - The admin account from `stride admin create` (used to seed products)
//!
//! Run with: cargo test -p stride-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use stride_integration_tests::{
    admin_client, base_url, client, json_i64, json_str, register_and_login, seed_product,
};

// ============================================================================
// Cart Flow
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_add_view_update_remove_flow() {
    let base_url = base_url();
    let admin = admin_client(&base_url).await;
    let product_id = seed_product(&admin, &base_url, "9", 10).await;

    let client = client();
    register_and_login(&client, &base_url).await;

    // Add two pairs
    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "size": "9", "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse add body");
    assert_eq!(json_str(&body, "/message"), "Item added to cart");
    assert_eq!(json_i64(&body, "/cart/items/0/quantity"), 2);

    // Adding the same line again merges quantities
    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "size": "9" }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse add body");
    assert_eq!(json_i64(&body, "/cart/items/0/quantity"), 3);

    // The view resolves product details per line
    let resp = client
        .get(format!("{base_url}/api/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse cart view");
    assert_eq!(json_i64(&body, "/items/0/product_id"), product_id);
    assert_eq!(json_str(&body, "/items/0/size"), "9");
    assert_eq!(json_str(&body, "/items/0/product/price"), "49.99");
    assert!(
        body.pointer("/items/0/product/name")
            .and_then(Value::as_str)
            .is_some_and(|name| name.starts_with("Test Product"))
    );

    // Set an absolute quantity
    let resp = client
        .put(format!("{base_url}/api/cart/update"))
        .json(&json!({ "product_id": product_id, "size": "9", "quantity": 1 }))
        .send()
        .await
        .expect("Failed to update cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse update body");
    assert_eq!(json_i64(&body, "/items/0/quantity"), 1);

    // Remove the line
    let resp = client
        .post(format!("{base_url}/api/cart/remove"))
        .json(&json!({ "product_id": product_id, "size": "9" }))
        .send()
        .await
        .expect("Failed to remove from cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse remove body");
    assert_eq!(json_str(&body, "/message"), "Item removed");
    assert_eq!(
        body.pointer("/cart/items").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );

    // Clear is idempotent even on an empty cart
    let resp = client
        .delete(format!("{base_url}/api/cart/clear"))
        .send()
        .await
        .expect("Failed to clear cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse clear body");
    assert_eq!(json_str(&body, "/message"), "Cart cleared");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_cart_view_is_empty_for_fresh_account() {
    let base_url = base_url();
    let client = client();
    register_and_login(&client, &base_url).await;

    let resp = client
        .get(format!("{base_url}/api/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse cart view");
    assert_eq!(
        body.pointer("/items").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
}

// ============================================================================
// Validation & Stock Limits
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_add_requires_login() {
    let base_url = base_url();

    let resp = client()
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": 1, "size": "9", "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Please login first");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_add_rejects_bad_lines() {
    let base_url = base_url();
    let admin = admin_client(&base_url).await;
    let product_id = seed_product(&admin, &base_url, "9", 5).await;

    let client = client();
    register_and_login(&client, &base_url).await;

    // Missing size
    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Size is required");

    // Zero quantity
    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "size": "9", "quantity": 0 }))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Quantity must be at least 1");

    // Unknown product
    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": 999_999_999, "size": "9", "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Product not found");

    // Unknown size on a real product
    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "size": "13", "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Size 13 not available");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_add_enforces_stock_limits() {
    let base_url = base_url();
    let admin = admin_client(&base_url).await;
    let product_id = seed_product(&admin, &base_url, "9", 5).await;

    let client = client();
    register_and_login(&client, &base_url).await;

    // More than stock in one go
    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "size": "9", "quantity": 6 }))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Only 5 available for size 9");

    // The limit also applies across merged adds
    for _ in 0..2 {
        let resp = client
            .post(format!("{base_url}/api/cart/add"))
            .json(&json!({ "product_id": product_id, "size": "9", "quantity": 2 }))
            .send()
            .await
            .expect("Failed to send add");
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "size": "9", "quantity": 2 }))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_add_out_of_stock_size() {
    let base_url = base_url();
    let admin = admin_client(&base_url).await;
    let product_id = seed_product(&admin, &base_url, "9", 0).await;

    let client = client();
    register_and_login(&client, &base_url).await;

    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "size": "9", "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send add");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert!(
        json_str(&body, "/message").ends_with("(Size 9) is Out of Stock"),
        "unexpected message: {body}"
    );
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_update_without_cart_is_not_found() {
    let base_url = base_url();
    let client = client();
    register_and_login(&client, &base_url).await;

    let resp = client
        .put(format!("{base_url}/api/cart/update"))
        .json(&json!({ "product_id": 1, "size": "9", "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Cart not found");
}
