//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::user::{CreateUser, UpdateUser, User},
    AppState,
};

use super::ValidatedJson;

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All registered users", body = Vec<User>)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list_users().await?;
    Ok(Json(users))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<User>> {
    let user = state.services.users.get_user(id).await?;
    Ok(Json(user))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(user): ValidatedJson<CreateUser>,
) -> AppResult<Json<User>> {
    let created = state.services.users.create_user(user).await?;
    Ok(Json(created))
}

/// Update some fields of a user
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(changes): ValidatedJson<UpdateUser>,
) -> AppResult<Json<User>> {
    let updated = state.services.users.update_user(id, changes).await?;
    Ok(Json(updated))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.services.users.delete_user(id).await?;
    Ok(StatusCode::OK)
}
