//! Integration tests for checkout, order history and cancellation.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p stride-api)
//! - The admin account from `stride admin create` (used to seed products)
//!
//! Run with: cargo test -p stride-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use stride_integration_tests::{
    admin_client, base_url, client, json_i64, json_str, register_and_login, seed_product, stock_of,
};

/// Add a line to the session's cart, asserting success.
async fn add_to_cart(client: &Client, base_url: &str, product_id: i64, quantity: u32) {
    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "size": "9", "quantity": quantity }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK, "cart add failed");
}

/// Checkout the session's cart, asserting success, and return the order id.
async fn checkout(client: &Client, base_url: &str) -> i64 {
    let resp = client
        .post(format!("{base_url}/api/orders"))
        .send()
        .await
        .expect("Failed to checkout");
    assert_eq!(resp.status(), StatusCode::CREATED, "checkout failed");
    let body: Value = resp.json().await.expect("Failed to parse order body");
    assert_eq!(json_str(&body, "/message"), "Order placed successfully");
    json_i64(&body, "/order/id")
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_checkout_debits_stock_and_empties_cart() {
    let base_url = base_url();
    let admin = admin_client(&base_url).await;
    let product_id = seed_product(&admin, &base_url, "9", 10).await;

    let client = client();
    register_and_login(&client, &base_url).await;
    add_to_cart(&client, &base_url, product_id, 2).await;

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .send()
        .await
        .expect("Failed to checkout");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse order body");
    assert_eq!(json_str(&body, "/order/status"), "Pending");
    assert_eq!(json_str(&body, "/order/total"), "99.98");
    assert_eq!(json_i64(&body, "/order/items/0/product_id"), product_id);
    assert_eq!(json_i64(&body, "/order/items/0/quantity"), 2);

    // Stock went down
    assert_eq!(stock_of(&client, &base_url, product_id, "9").await, 8);

    // The cart is now empty
    let resp = client
        .get(format!("{base_url}/api/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");
    let cart: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(
        cart.pointer("/items").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_checkout_empty_cart_rejected() {
    let base_url = base_url();
    let client = client();
    register_and_login(&client, &base_url).await;

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .send()
        .await
        .expect("Failed to send checkout");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Cart is empty");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_checkout_fails_when_stock_shrank_after_adding() {
    let base_url = base_url();
    let admin = admin_client(&base_url).await;
    let product_id = seed_product(&admin, &base_url, "9", 3).await;

    let client = client();
    register_and_login(&client, &base_url).await;
    add_to_cart(&client, &base_url, product_id, 3).await;

    // Stock shrinks between add-to-cart and checkout
    let form = reqwest::multipart::Form::new()
        .text("sizes", json!([{ "size": "9", "stock": 1 }]).to_string());
    let resp = admin
        .put(format!("{base_url}/api/products/{product_id}"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK, "product update failed");

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .send()
        .await
        .expect("Failed to send checkout");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert!(
        json_str(&body, "/message").starts_with("Only 1 left for size 9"),
        "unexpected message: {body}"
    );

    // The failed checkout did not consume the remaining stock
    assert_eq!(stock_of(&client, &base_url, product_id, "9").await, 1);
}

// ============================================================================
// History & Ownership
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_order_history_and_detail() {
    let base_url = base_url();
    let admin = admin_client(&base_url).await;
    let product_id = seed_product(&admin, &base_url, "9", 10).await;

    let client = client();
    register_and_login(&client, &base_url).await;
    add_to_cart(&client, &base_url, product_id, 1).await;
    let order_id = checkout(&client, &base_url).await;

    let resp = client
        .get(format!("{base_url}/api/orders"))
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::OK);
    let orders: Value = resp.json().await.expect("Failed to parse orders");
    let orders = orders.as_array().expect("orders is not an array");
    assert_eq!(orders.len(), 1);

    let resp = client
        .get(format!("{base_url}/api/orders/{order_id}"))
        .send()
        .await
        .expect("Failed to fetch order");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(json_i64(&body, "/id"), order_id);
    assert_eq!(json_str(&body, "/total"), "49.99");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_orders_are_scoped_to_their_owner() {
    let base_url = base_url();
    let admin = admin_client(&base_url).await;
    let product_id = seed_product(&admin, &base_url, "9", 10).await;

    let owner = client();
    register_and_login(&owner, &base_url).await;
    add_to_cart(&owner, &base_url, product_id, 1).await;
    let order_id = checkout(&owner, &base_url).await;

    let other = client();
    register_and_login(&other, &base_url).await;

    // Foreign orders read as not found, never forbidden
    let resp = other
        .get(format!("{base_url}/api/orders/{order_id}"))
        .send()
        .await
        .expect("Failed to fetch order");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = other
        .put(format!("{base_url}/api/orders/cancel/{order_id}"))
        .send()
        .await
        .expect("Failed to send cancel");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Order not found");

    // The owner still can cancel
    let resp = owner
        .put(format!("{base_url}/api/orders/cancel/{order_id}"))
        .send()
        .await
        .expect("Failed to cancel");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_cancel_restores_stock_once() {
    let base_url = base_url();
    let admin = admin_client(&base_url).await;
    let product_id = seed_product(&admin, &base_url, "9", 5).await;

    let client = client();
    register_and_login(&client, &base_url).await;
    add_to_cart(&client, &base_url, product_id, 2).await;
    let order_id = checkout(&client, &base_url).await;
    assert_eq!(stock_of(&client, &base_url, product_id, "9").await, 3);

    let resp = client
        .put(format!("{base_url}/api/orders/cancel/{order_id}"))
        .send()
        .await
        .expect("Failed to cancel");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse cancel body");
    assert_eq!(json_str(&body, "/message"), "Order cancelled successfully");
    assert_eq!(json_str(&body, "/order/status"), "Cancelled");
    assert_eq!(stock_of(&client, &base_url, product_id, "9").await, 5);

    // A second cancel must not credit stock again
    let resp = client
        .put(format!("{base_url}/api/orders/cancel/{order_id}"))
        .send()
        .await
        .expect("Failed to send cancel");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Order already cancelled");
    assert_eq!(stock_of(&client, &base_url, product_id, "9").await, 5);
}
