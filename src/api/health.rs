//! Health check endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

/// Booking and comment rule switches the server is running with
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRules {
    pub reject_overlapping_bookings: bool,
    pub comment_requires_completed_booking: bool,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub rules: ActiveRules,
}

/// Liveness probe, also reporting which optional rules are enabled
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let rules = &state.config.rules;
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "shareit".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        rules: ActiveRules {
            reject_overlapping_bookings: rules.reject_overlapping_bookings,
            comment_requires_completed_booking: rules.comment_requires_completed_booking,
        },
    })
}
