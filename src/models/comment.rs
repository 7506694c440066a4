//! Comment model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::not_blank;

/// Comment left on an item, joined with its author's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub created: NaiveDateTime,
}

/// Create comment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub item_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: NaiveDateTime,
}
