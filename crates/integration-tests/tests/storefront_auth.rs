//! Integration tests for registration, login and sessions.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p stride-api)
//!
//! Run with: cargo test -p stride-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use stride_integration_tests::{
    CUSTOMER_PASSWORD, base_url, client, json_str, register_and_login, unique_email,
};

// ============================================================================
// Registration & Login Flow
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_login_me_logout_flow() {
    let client = client();
    let base_url = base_url();
    let email = unique_email("flow");

    // Register
    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "name": "Flow Test",
            "email": email,
            "password": CUSTOMER_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse register body");
    assert_eq!(json_str(&body, "/message"), "User registered successfully");

    // Login sets the session cookie
    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": CUSTOMER_PASSWORD }))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse login body");
    assert_eq!(json_str(&body, "/message"), "Login successful");
    assert_eq!(json_str(&body, "/user/email"), email);
    assert_eq!(json_str(&body, "/user/role"), "customer");

    // The session identifies us
    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .send()
        .await
        .expect("Failed to fetch me");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse me body");
    assert_eq!(json_str(&body, "/user/email"), email);

    // Logout destroys the session
    let resp = client
        .post(format!("{base_url}/api/auth/logout"))
        .send()
        .await
        .expect("Failed to logout");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse logout body");
    assert_eq!(json_str(&body, "/message"), "Logged out successfully");

    // The cookie no longer works
    let resp = client
        .get(format!("{base_url}/api/auth/me"))
        .send()
        .await
        .expect("Failed to fetch me after logout");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_duplicate_email_conflicts() {
    let client = client();
    let base_url = base_url();
    let email = unique_email("duplicate");

    let register = json!({
        "name": "First",
        "email": email,
        "password": CUSTOMER_PASSWORD,
    });

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&register)
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&register)
        .send()
        .await
        .expect("Failed to re-register");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse conflict body");
    assert_eq!(json_str(&body, "/message"), "User already exists");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_rejects_blank_name_and_short_password() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "name": "   ",
            "email": unique_email("noname"),
            "password": CUSTOMER_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to send register");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Name is required");

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "name": "Short Password",
            "email": unique_email("shortpw"),
            "password": "short",
        }))
        .send()
        .await
        .expect("Failed to send register");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(
        json_str(&body, "/message"),
        "Password must be at least 8 characters"
    );
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_failures() {
    let client = client();
    let base_url = base_url();

    // Unknown email
    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({
            "email": unique_email("nobody"),
            "password": CUSTOMER_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "User not found");

    // Wrong password on a real account
    let email = register_and_login(&client, &base_url).await;
    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to send login");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Invalid password");
}

// ============================================================================
// Admin Access Boundaries
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_admin_login_rejects_customer_account() {
    let client = client();
    let base_url = base_url();
    let email = register_and_login(&client, &base_url).await;

    let resp = client
        .post(format!("{base_url}/api/auth/admin/login"))
        .json(&json!({ "email": email, "password": CUSTOMER_PASSWORD }))
        .send()
        .await
        .expect("Failed to send admin login");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Admin not found");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_create_admin_requires_admin_session() {
    let base_url = base_url();

    // No session at all
    let resp = client()
        .post(format!("{base_url}/api/auth/create-admin"))
        .json(&json!({
            "name": "Wannabe",
            "email": unique_email("wannabe"),
            "password": CUSTOMER_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to send create-admin");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // A customer session is not enough
    let client = client();
    register_and_login(&client, &base_url).await;
    let resp = client
        .post(format!("{base_url}/api/auth/create-admin"))
        .json(&json!({
            "name": "Wannabe",
            "email": unique_email("wannabe"),
            "password": CUSTOMER_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to send create-admin");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Access denied: Admins only");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_me_requires_session() {
    let base_url = base_url();

    let resp = client()
        .get(format!("{base_url}/api/auth/me"))
        .send()
        .await
        .expect("Failed to fetch me");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(json_str(&body, "/message"), "Please login first");
}
