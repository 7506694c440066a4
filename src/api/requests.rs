//! Item request endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        item_request::{CreateItemRequest, ItemRequestDetails},
        PageQuery,
    },
    AppState,
};

use super::{QueryParams, SharerUser, ValidatedJson};

/// Post a request for an item nobody lists yet
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    params(("X-Sharer-User-Id" = i64, Header, description = "Requestor")),
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Request created", body = ItemRequestDetails),
        (status = 400, description = "Blank description", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    ValidatedJson(request): ValidatedJson<CreateItemRequest>,
) -> AppResult<Json<ItemRequestDetails>> {
    let created = state.services.requests.create_request(user_id, request).await?;
    Ok(Json(created))
}

/// List the caller's requests, newest first, with the items answering them
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(("X-Sharer-User-Id" = i64, Header, description = "Requestor")),
    responses(
        (status = 200, description = "Caller's requests", body = Vec<ItemRequestDetails>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_own_requests(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
) -> AppResult<Json<Vec<ItemRequestDetails>>> {
    let requests = state.services.requests.list_own(user_id).await?;
    Ok(Json(requests))
}

/// List other users' requests, newest first
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Requests of other users", body = Vec<ItemRequestDetails>),
        (status = 400, description = "Invalid page", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_other_requests(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<Vec<ItemRequestDetails>>> {
    let requests = state.services.requests.list_others(user_id, query.page()?).await?;
    Ok(Json(requests))
}

/// Get a single request with its items
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user"),
        ("id" = i64, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request details", body = ItemRequestDetails),
        (status = 404, description = "User or request not found", body = ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemRequestDetails>> {
    let request = state.services.requests.get_request(user_id, id).await?;
    Ok(Json(request))
}
