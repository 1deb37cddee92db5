//! HTTP route handlers for the API.
//!
//! All routes below are mounted under `/api`.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST /auth/register          - Create a customer account
//! POST /auth/login             - Establish a session
//! POST /auth/admin/login       - Establish an admin session
//! POST /auth/create-admin      - Create an admin account (admin)
//! POST /auth/logout            - Destroy the session
//! GET  /auth/me                - Echo the cached session identity
//!
//! # Catalog (public read, admin write)
//! GET    /products             - Product listing
//! GET    /products/{id}        - Product detail
//! POST   /products             - Create product (multipart, admin)
//! PUT    /products/{id}        - Update product (multipart, admin)
//! DELETE /products/{id}        - Delete product (admin)
//! GET    /categories           - Category listing
//! GET    /categories/{id}      - Category detail
//! POST   /categories           - Create category (admin)
//! PUT    /categories/{id}      - Update category (admin)
//! DELETE /categories/{id}      - Delete category (admin)
//!
//! # Cart (session)
//! GET    /cart                 - Cart with product details
//! POST   /cart/add             - Add an item
//! PUT    /cart/update          - Set a line's quantity
//! POST   /cart/remove          - Remove a line
//! DELETE /cart/clear           - Delete the cart
//!
//! # Orders (session)
//! POST /orders                 - Checkout the cart
//! GET  /orders                 - Order history
//! GET  /orders/{id}            - One of the caller's orders
//! PUT  /orders/cancel/{order_id} - Cancel and restore stock
//!
//! # Admin
//! GET    /admin/orders         - Every order with account details
//! GET    /admin/orders/{id}    - Any order
//! PUT    /admin/orders/{id}    - Edit status/items/total
//! DELETE /admin/orders/{id}    - Delete an order
//! GET    /admin/users          - Every account
//! PUT    /admin/users/toggle/{user_id} - Flip an account's active flag
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/admin/login", post(auth::admin_login))
        .route("/create-admin", post(auth::create_admin))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route(
            "/{id}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::remove),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", put(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", delete(cart::clear))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/cancel/{order_id}", put(orders::cancel))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(admin::orders::index))
        .route(
            "/orders/{id}",
            get(admin::orders::show)
                .put(admin::orders::update)
                .delete(admin::orders::remove),
        )
        .route("/users", get(admin::users::index))
        .route("/users/toggle/{user_id}", put(admin::users::toggle))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/admin", admin_routes())
}
