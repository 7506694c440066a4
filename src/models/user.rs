//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::not_blank;

/// Registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Unique across all users
    pub email: String,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Partial user update; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl UpdateUser {
    /// Merge the provided fields into `user`
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
    }
}
