//! Booking endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        booking::{ApprovalQuery, BookingListQuery, BookingResponse, CreateBooking},
        Page,
    },
    AppState,
};

use super::{QueryParams, SharerUser, ValidatedJson};

/// Request a booking of someone else's item
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    params(("X-Sharer-User-Id" = i64, Header, description = "Booker")),
    request_body = CreateBooking,
    responses(
        (status = 200, description = "Booking created in WAITING status", body = BookingResponse),
        (status = 400, description = "Invalid dates or item unavailable", body = ErrorResponse),
        (status = 404, description = "Booker or item not found, or item owned by the booker", body = ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    ValidatedJson(request): ValidatedJson<CreateBooking>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.services.bookings.create_booking(user_id, request).await?;
    Ok(Json(booking.into()))
}

/// Approve or reject a booking of the caller's item
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Owner of the booked item"),
        ("id" = i64, Path, description = "Booking ID"),
        ApprovalQuery
    ),
    responses(
        (status = 200, description = "Booking status updated", body = BookingResponse),
        (status = 400, description = "Booking already approved", body = ErrorResponse),
        (status = 404, description = "Booking not found or caller is not the owner", body = ErrorResponse)
    )
)]
pub async fn set_approval(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    Path(id): Path<i64>,
    QueryParams(query): QueryParams<ApprovalQuery>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state
        .services
        .bookings
        .set_approval(user_id, id, query.approved)
        .await?;
    Ok(Json(booking.into()))
}

/// Get a booking as its booker or as the item owner
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Booker or item owner"),
        ("id" = i64, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingResponse),
        (status = 404, description = "Booking not found or not visible to the caller", body = ErrorResponse)
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.services.bookings.get_booking(user_id, id).await?;
    Ok(Json(booking.into()))
}

/// List the caller's own bookings
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Booker"),
        BookingListQuery
    ),
    responses(
        (status = 200, description = "Bookings in the requested state", body = Vec<BookingResponse>),
        (status = 400, description = "Unknown state or invalid page", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_booker_bookings(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    QueryParams(query): QueryParams<BookingListQuery>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let page = Page::new(query.from, query.size)?;
    let bookings = state
        .services
        .bookings
        .list_by_booker(user_id, query.state.as_deref(), page)
        .await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// List bookings of the caller's items
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Item owner"),
        BookingListQuery
    ),
    responses(
        (status = 200, description = "Bookings in the requested state", body = Vec<BookingResponse>),
        (status = 400, description = "Unknown state or invalid page", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    SharerUser(user_id): SharerUser,
    QueryParams(query): QueryParams<BookingListQuery>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let page = Page::new(query.from, query.size)?;
    let bookings = state
        .services
        .bookings
        .list_by_owner(user_id, query.state.as_deref(), page)
        .await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}
