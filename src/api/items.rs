//! Item catalog and comment endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        comment::{Comment, CreateComment},
        item::{CreateItem, Item, ItemDetails, ItemSearchQuery, UpdateItem},
        Page, PageQuery,
    },
    AppState,
};

use super::{QueryParams, SharerUser, ValidatedJson};

/// List the caller's items with bookings and comments
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Items owned by the caller", body = Vec<ItemDetails>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<Vec<ItemDetails>>> {
    let items = state.services.items.list_owner_items(user_id, query.page()?).await?;
    Ok(Json(items))
}

/// Get item details by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Calling user"),
        ("id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item with comments; the owner also gets last and next bookings", body = ItemDetails),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemDetails>> {
    let item = state.services.items.get_item(user_id, id).await?;
    Ok(Json(item))
}

/// List a new item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    params(("X-Sharer-User-Id" = i64, Header, description = "Owner of the new item")),
    request_body = CreateItem,
    responses(
        (status = 200, description = "Item created", body = Item),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Owner or item request not found", body = ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    ValidatedJson(item): ValidatedJson<CreateItem>,
) -> AppResult<Json<Item>> {
    let created = state.services.items.create_item(user_id, item).await?;
    Ok(Json(created))
}

/// Update some fields of one of the caller's items
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Owner of the item"),
        ("id" = i64, Path, description = "Item ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 404, description = "Item not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    Path(id): Path<i64>,
    ValidatedJson(changes): ValidatedJson<UpdateItem>,
) -> AppResult<Json<Item>> {
    let updated = state.services.items.update_item(user_id, id, changes).await?;
    Ok(Json(updated))
}

/// Delete one of the caller's items
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Owner of the item"),
        ("id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 404, description = "Item not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.items.delete_item(user_id, id).await?;
    Ok(StatusCode::OK)
}

/// Search available items by name or description
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(ItemSearchQuery),
    responses(
        (status = 200, description = "Matching available items", body = Vec<Item>)
    )
)]
pub async fn search_items(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ItemSearchQuery>,
) -> AppResult<Json<Vec<Item>>> {
    let page = Page::new(query.from, query.size)?;
    let text = query.text.unwrap_or_default();
    let items = state.services.items.search(&text, page).await?;
    Ok(Json(items))
}

/// Comment on an item the caller has booked
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Comment author"),
        ("id" = i64, Path, description = "Item ID")
    ),
    request_body = CreateComment,
    responses(
        (status = 200, description = "Comment added", body = Comment),
        (status = 400, description = "Blank text or no eligible booking", body = ErrorResponse),
        (status = 404, description = "Author or item not found", body = ErrorResponse)
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    Path(id): Path<i64>,
    ValidatedJson(comment): ValidatedJson<CreateComment>,
) -> AppResult<Json<Comment>> {
    let created = state.services.items.add_comment(user_id, id, comment).await?;
    Ok(Json(created))
}
