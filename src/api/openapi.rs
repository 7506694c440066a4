//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, health, items, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShareIt API",
        version = "1.0.0",
        description = "Peer-to-peer item lending REST API"
    ),
    paths(
        // Health
        health::health_check,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Items
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        items::search_items,
        items::add_comment,
        // Bookings
        bookings::create_booking,
        bookings::set_approval,
        bookings::get_booking,
        bookings::list_booker_bookings,
        bookings::list_owner_bookings,
        // Requests
        requests::create_request,
        requests::list_own_requests,
        requests::list_other_requests,
        requests::get_request,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Items
            crate::models::item::Item,
            crate::models::item::ItemDetails,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            crate::models::comment::Comment,
            crate::models::comment::CreateComment,
            // Bookings
            crate::models::booking::BookingStatus,
            crate::models::booking::BookingResponse,
            crate::models::booking::BookingShort,
            crate::models::booking::BookerRef,
            crate::models::booking::BookedItemRef,
            crate::models::booking::CreateBooking,
            // Requests
            crate::models::item_request::ItemRequestDetails,
            crate::models::item_request::CreateItemRequest,
            // Health
            health::HealthResponse,
            health::ActiveRules,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User registry"),
        (name = "items", description = "Item catalog and comments"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "requests", description = "Item request board")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
