//! Integration tests for Stride.
//!
//! The tests under `tests/` drive a running API server over HTTP with a
//! cookie store, the same way a browser client would. They create their
//! own accounts, categories and products (unique per run), so they can
//! be re-run against the same database without cleanup.
//!
//! # Running Tests
//!
//! ```bash
//! # 1. Start PostgreSQL and run migrations
//! cargo run -p stride-cli -- migrate
//!
//! # 2. Create the admin account the tests log in with
//! cargo run -p stride-cli -- admin create \
//!     -e admin@example.com -n "Test Admin" -p "stride-admin-password"
//!
//! # 3. Start the API
//! cargo run -p stride-api
//!
//! # 4. Run the tests
//! cargo test -p stride-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STRIDE_API_BASE_URL` - Base URL of the running API (default `http://localhost:5000`)
//! - `STRIDE_ADMIN_EMAIL` - Admin login email (default `admin@example.com`)
//! - `STRIDE_ADMIN_PASSWORD` - Admin login password (default `stride-admin-password`)

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Password used for every throwaway customer account.
pub const CUSTOMER_PASSWORD: &str = "password123";

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STRIDE_API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

fn admin_email() -> String {
    std::env::var("STRIDE_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string())
}

fn admin_password() -> String {
    std::env::var("STRIDE_ADMIN_PASSWORD").unwrap_or_else(|_| "stride-admin-password".to_string())
}

/// A cookie-holding client, equivalent to one browser session.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Unique email per call so re-runs never collide.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4())
}

/// Extract an integer at a JSON pointer path, panicking with context.
#[must_use]
pub fn json_i64(body: &Value, pointer: &str) -> i64 {
    body.pointer(pointer)
        .and_then(Value::as_i64)
        .unwrap_or_else(|| panic!("missing integer at {pointer} in {body}"))
}

/// Extract a string at a JSON pointer path, panicking with context.
#[must_use]
pub fn json_str<'a>(body: &'a Value, pointer: &str) -> &'a str {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing string at {pointer} in {body}"))
}

/// Register a fresh customer on this client and log in.
///
/// Returns the generated email; the password is [`CUSTOMER_PASSWORD`].
pub async fn register_and_login(client: &Client, base_url: &str) -> String {
    let email = unique_email("customer");

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "name": "Integration Test",
            "email": email,
            "password": CUSTOMER_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED, "register failed");

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": CUSTOMER_PASSWORD }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), StatusCode::OK, "login failed");

    email
}

/// A client logged in as the seeded admin account.
pub async fn admin_client(base_url: &str) -> Client {
    let client = client();
    let email = admin_email();

    let resp = client
        .post(format!("{base_url}/api/auth/admin/login"))
        .json(&json!({ "email": email, "password": admin_password() }))
        .send()
        .await
        .expect("Failed to send admin login");
    assert_eq!(
        resp.status(),
        StatusCode::OK,
        "admin login as {email} failed; create the account first with `stride admin create`"
    );

    client
}

/// Create a category and a single-size product through the admin API.
///
/// Category name and SKU are unique per call so tests never collide with
/// each other or with earlier runs. The product is priced at 49.99.
///
/// Returns the new product's id.
pub async fn seed_product(admin: &Client, base_url: &str, size: &str, stock: u32) -> i64 {
    let suffix = Uuid::new_v4().simple().to_string();
    let category = format!("test-category-{suffix}");

    let resp = admin
        .post(format!("{base_url}/api/categories"))
        .json(&json!({
            "name": category,
            "description": "created by integration tests",
        }))
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(resp.status(), StatusCode::CREATED, "category create failed");

    let sizes = json!([{ "size": size, "stock": stock }]).to_string();
    let form = reqwest::multipart::Form::new()
        .text("name", format!("Test Product {suffix}"))
        .text("description", "created by integration tests")
        .text("price", "49.99")
        .text("category", category)
        .text("sku", format!("TEST-{suffix}"))
        .text("sizes", sizes);

    let resp = admin
        .post(format!("{base_url}/api/products"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED, "product create failed");

    let body: Value = resp.json().await.expect("Failed to parse product response");
    json_i64(&body, "/product/id")
}

/// Fetch a product and return the remaining stock for one size label.
pub async fn stock_of(client: &Client, base_url: &str, product_id: i64, size: &str) -> i64 {
    let resp = client
        .get(format!("{base_url}/api/products/{product_id}"))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::OK, "product fetch failed");

    let body: Value = resp.json().await.expect("Failed to parse product");
    body.get("sizes")
        .and_then(Value::as_array)
        .and_then(|sizes| {
            sizes
                .iter()
                .find(|v| v.get("size").and_then(Value::as_str) == Some(size))
        })
        .and_then(|v| v.get("stock"))
        .and_then(Value::as_i64)
        .unwrap_or_else(|| panic!("size {size} missing from product {product_id}"))
}
