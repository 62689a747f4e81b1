use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};

use super::error::{internal_error, ApiError};
use super::extract::{Json, Path};
use super::middleware::AuthUser;
use super::AppState;
use crate::auth::{hash_password, verify_password};
use crate::models::*;

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Accounts
// ============================================================

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<CredentialsInput>,
) -> Result<Json<User>, ApiError> {
    let existing = state
        .db
        .find_user_by_email(&input.email)
        .map_err(internal_error("Server error"))?;
    if existing.is_some() {
        tracing::warn!("Registration rejected, user exists: {}", input.email);
        return Err(ApiError::Conflict("User already exists"));
    }

    let password = input.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(internal_error("Server error"))?
        .map_err(internal_error("Server error"))?;

    // A concurrent registration may have taken the email since the check above.
    let user = state
        .db
        .create_user(&input.email, &hash)
        .map_err(internal_error("Server error"))?
        .ok_or(ApiError::Conflict("User already exists"))?;

    tracing::info!("Registered user {}", user.id);
    Ok(Json(user))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<CredentialsInput>,
) -> Result<Response, ApiError> {
    let user = state
        .db
        .find_user_by_email(&input.email)
        .map_err(internal_error("Server error"))?
        .ok_or(ApiError::NotFound("User not found"))?;

    let password = input.password;
    let stored = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(internal_error("Server error"))?
        .map_err(internal_error("Server error"))?;

    if !matches {
        tracing::warn!("Wrong password for user {}", user.id);
        return Ok((StatusCode::UNAUTHORIZED, Json(LoginResponse::denied())).into_response());
    }

    let token = state
        .tokens
        .issue(user.id)
        .map_err(internal_error("Server error"))?;

    tracing::info!("User {} logged in", user.id);
    Ok(Json(LoginResponse::granted(token, user.email)).into_response())
}

// ============================================================
// Notes (owner-scoped, behind the token guard)
// ============================================================

pub async fn list_notes(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<Note>>, ApiError> {
    state
        .db
        .get_notes_by_user(user_id)
        .map(Json)
        .map_err(internal_error("Error fetching notes"))
}

pub async fn create_note(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(input): Json<NoteInput>,
) -> Result<Json<Note>, ApiError> {
    state
        .db
        .create_note(user_id, input)
        .map(Json)
        .map_err(internal_error("Error adding note"))
}

/// Deleting a missing or foreign note is not an error; the response is the same.
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<StatusResponse>, ApiError> {
    let removed = state
        .db
        .delete_note(user_id, id)
        .map_err(internal_error("Error deleting note"))?;
    if !removed {
        tracing::debug!("Delete of note {} by user {} matched nothing", id, user_id);
    }
    Ok(Json(StatusResponse::new("deleted")))
}

/// Same ownership rule as [`delete_note`]: no match is a silent no-op.
pub async fn edit_note(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(input): Json<NoteInput>,
) -> Result<Json<StatusResponse>, ApiError> {
    let updated = state
        .db
        .update_note(user_id, id, input)
        .map_err(internal_error("Error updating note"))?;
    if updated.is_none() {
        tracing::debug!("Edit of note {} by user {} matched nothing", id, user_id);
    }
    Ok(Json(StatusResponse::new("updated")))
}
