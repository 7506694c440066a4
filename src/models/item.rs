//! Item (listed thing) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{booking::BookingShort, comment::Comment, not_blank};

/// Listed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    /// Set at creation, never changes
    pub owner_id: i64,
    /// Item request this listing answers, if any
    pub request_id: Option<i64>,
}

/// Item with its comments and, for the owner, the surrounding approved bookings
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
    pub last_booking: Option<BookingShort>,
    pub next_booking: Option<BookingShort>,
    pub comments: Vec<Comment>,
}

impl ItemDetails {
    pub fn new(item: Item, comments: Vec<Comment>) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            owner_id: item.owner_id,
            request_id: item.request_id,
            last_booking: None,
            next_booking: None,
            comments,
        }
    }

    pub fn with_bookings(mut self, last: Option<BookingShort>, next: Option<BookingShort>) -> Self {
        self.last_booking = last;
        self.next_booking = next;
        self
    }
}

/// Create item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(required(message = "must be set"))]
    pub available: Option<bool>,
    pub request_id: Option<i64>,
}

/// Partial item update; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl UpdateItem {
    /// Merge the provided fields into `item`
    pub fn apply_to(self, item: &mut Item) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(available) = self.available {
            item.available = available;
        }
    }
}

/// Query parameters for item search
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ItemSearchQuery {
    /// Text matched against name and description
    pub text: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}
