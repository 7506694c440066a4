//! API handlers for ShareIt REST endpoints

pub mod bookings;
pub mod health;
pub mod items;
pub mod openapi;
pub mod requests;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{error::AppError, AppState};

/// Header carrying the id of the calling user
pub const SHARER_USER_HEADER: &str = "X-Sharer-User-Id";

/// Extractor for the calling user's id
pub struct SharerUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for SharerUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SHARER_USER_HEADER)
            .ok_or_else(|| AppError::Validation(format!("Missing {} header", SHARER_USER_HEADER)))?;
        let value = raw
            .to_str()
            .map_err(|_| AppError::Validation(format!("Invalid {} header: not ASCII", SHARER_USER_HEADER)))?;

        let user_id = value
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Validation(format!("Invalid {} header: {}", SHARER_USER_HEADER, value)))?;

        Ok(SharerUser(user_id))
    }
}

/// JSON body extractor that runs `validator` rules and reports failures as `{"error": ...}`
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string extractor reporting malformed parameters as `{"error": ...}`
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(QueryParams(value))
    }
}

/// Build the API routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // Items
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/search", get(items::search_items))
        .route(
            "/items/:id",
            get(items::get_item)
                .patch(items::update_item)
                .delete(items::delete_item),
        )
        .route("/items/:id/comment", post(items::add_comment))
        // Bookings
        .route("/bookings", get(bookings::list_booker_bookings).post(bookings::create_booking))
        .route("/bookings/owner", get(bookings::list_owner_bookings))
        .route(
            "/bookings/:id",
            get(bookings::get_booking).patch(bookings::set_approval),
        )
        // Item requests
        .route("/requests", get(requests::list_own_requests).post(requests::create_request))
        .route("/requests/all", get(requests::list_other_requests))
        .route("/requests/:id", get(requests::get_request))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, StatusCode},
    };
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::AppConfig,
        models::{Booking, BookingStatus},
        services::{
            test_support::{booking, item, user, Mocks},
            Services,
        },
    };

    fn app(mocks: Mocks) -> Router {
        let config = AppConfig::default();
        let services = Services::new(mocks.into_repository(), config.rules.clone());
        router(AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }

    async fn call(app: Router, method: Method, uri: &str, user: Option<i64>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if let Some(id) = user {
            builder = builder.header(SHARER_USER_HEADER, id.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn stored_booking(status: BookingStatus) -> Booking {
        booking(1, 3, Utc::now().naive_utc(), 1, 2, status)
    }

    #[tokio::test]
    async fn missing_user_header_is_a_bad_request() {
        let (status, body) = call(app(Mocks::default()), Method::GET, "/bookings/1", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains(SHARER_USER_HEADER));
    }

    #[tokio::test]
    async fn non_ascii_user_header_is_invalid() {
        let request = axum::http::Request::builder()
            .uri("/bookings/1")
            .header(SHARER_USER_HEADER, axum::http::HeaderValue::from_bytes(&[0xE9]).unwrap())
            .body(Body::empty())
            .unwrap();

        let response = app(Mocks::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Invalid X-Sharer-User-Id header: not ASCII");
    }

    #[tokio::test]
    async fn health_reports_active_rules() {
        let (status, body) = call(app(Mocks::default()), Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "shareit");
        assert_eq!(body["rules"]["rejectOverlappingBookings"], false);
        assert_eq!(body["rules"]["commentRequiresCompletedBooking"], false);
    }

    #[tokio::test]
    async fn booking_lifecycle_over_http() {
        let mut mocks = Mocks::default();
        mocks.users.expect_get_by_id().returning(|id| Ok(user(id)));
        mocks.items.expect_get_by_id().returning(|id| Ok(item(id, 9, true)));
        mocks
            .bookings
            .expect_create()
            .returning(|_| Ok(stored_booking(BookingStatus::Waiting)));

        let start = (Utc::now() + Duration::hours(1)).naive_utc();
        let end = (Utc::now() + Duration::hours(2)).naive_utc();
        let (status, body) = call(
            app(mocks),
            Method::POST,
            "/bookings",
            Some(3),
            Some(json!({ "itemId": 5, "start": start, "end": end })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "WAITING");
        assert_eq!(body["booker"]["id"], 3);
        assert_eq!(body["item"]["id"], 5);
    }

    #[tokio::test]
    async fn second_approval_is_a_bad_request() {
        let mut mocks = Mocks::default();
        mocks
            .bookings
            .expect_get_by_id()
            .returning(|_| Ok(stored_booking(BookingStatus::Approved)));

        let (status, body) = call(app(mocks), Method::PATCH, "/bookings/1?approved=true", Some(9), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Booking with id 1 is already approved");
    }

    #[tokio::test]
    async fn stranger_cannot_read_booking() {
        let mut mocks = Mocks::default();
        mocks
            .bookings
            .expect_get_by_id()
            .returning(|_| Ok(stored_booking(BookingStatus::Waiting)));

        let (status, _) = call(app(mocks), Method::GET, "/bookings/1", Some(4), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_state_is_reported() {
        let (status, body) = call(
            app(Mocks::default()),
            Method::GET,
            "/bookings?state=UNSUPPORTED_STATUS",
            Some(3),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown state: UNSUPPORTED_STATUS");
    }

    #[tokio::test]
    async fn invalid_user_payload_is_rejected() {
        let mut mocks = Mocks::default();
        mocks.users.expect_create().never();

        let (status, body) = call(
            app(mocks),
            Method::POST,
            "/users",
            None,
            Some(json!({ "name": "Bob", "email": "not-an-email" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let mut mocks = Mocks::default();
        mocks.users.expect_email_exists().returning(|_, _| Ok(true));

        let (status, _) = call(
            app(mocks),
            Method::POST,
            "/users",
            None,
            Some(json!({ "name": "Bob", "email": "bob@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn blank_search_returns_empty_list() {
        let mut mocks = Mocks::default();
        mocks.items.expect_search().never();

        let (status, body) = call(app(mocks), Method::GET, "/items/search?text=", Some(3), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
