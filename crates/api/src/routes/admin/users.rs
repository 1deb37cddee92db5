//! Admin account handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use stride_core::AccountId;
use tracing::instrument;

use crate::db::AccountRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Account;
use crate::state::AppState;

/// `GET /admin/users`: every account. Password hashes ride in a
/// separate table and cannot appear here.
#[instrument(skip_all)]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Account>>> {
    let accounts = AccountRepository::new(state.pool());
    Ok(Json(accounts.list().await?))
}

/// `PUT /admin/users/toggle/{user_id}`: flip an account's active flag.
///
/// Deactivation blocks the next login but leaves any live session
/// untouched until it expires.
#[instrument(skip_all)]
pub async fn toggle(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<AccountId>,
) -> Result<impl IntoResponse> {
    let accounts = AccountRepository::new(state.pool());
    let account = accounts
        .toggle_active(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let message = if account.is_active {
        "User is now Active"
    } else {
        "User is now Inactive"
    };

    Ok(Json(json!({ "message": message, "user": account })))
}
