//! Authentication route handlers.
//!
//! Registration, login, admin login and session introspection. On a
//! successful login the account's id, name, email and role are cached in
//! the session; those cached claims are the sole authorization signal
//! until the next login.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAdmin, RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /auth/register`: create a customer account.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let auth = AuthService::new(state.pool());
    auth.register(name, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

/// `POST /auth/login`: establish a session.
#[instrument(skip(state, session, payload))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let account = auth.login(&payload.email, &payload.password).await?;

    let user = CurrentUser::from(&account);
    set_current_user(&session, &user).await?;

    Ok(Json(json!({ "message": "Login successful", "user": user })))
}

/// `POST /auth/admin/login`: establish an admin session.
#[instrument(skip(state, session, payload))]
pub async fn admin_login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let account = auth.admin_login(&payload.email, &payload.password).await?;

    let user = CurrentUser::from(&account);
    set_current_user(&session, &user).await?;

    Ok(Json(
        json!({ "message": "Admin login successful", "user": user }),
    ))
}

/// `POST /auth/create-admin`: create an admin account.
///
/// Only an existing admin may mint another; the first admin comes from
/// the CLI.
#[instrument(skip_all)]
pub async fn create_admin(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let auth = AuthService::new(state.pool());
    auth.create_admin(name, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Admin created successfully" })),
    ))
}

/// `POST /auth/logout`: destroy the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_user(&session).await?;

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// `GET /auth/me`: echo the cached session identity.
#[instrument(skip(user))]
pub async fn me(RequireAuth(user): RequireAuth) -> Json<serde_json::Value> {
    Json(json!({ "user": user }))
}
