//! Data models for ShareIt

pub mod booking;
pub mod comment;
pub mod item;
pub mod item_request;
pub mod user;

use serde::Deserialize;
use utoipa::IntoParams;
use validator::ValidationError;

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use booking::{Booking, BookingState, BookingStatus};
pub use comment::Comment;
pub use item::{Item, ItemDetails};
pub use item_request::{ItemRequest, ItemRequestDetails};
pub use user::User;

/// Default number of rows returned by list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Offset/limit window requested through `from` and `size` query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub from: i64,
    pub size: i64,
}

impl Page {
    pub fn new(from: Option<i64>, size: Option<i64>) -> AppResult<Self> {
        let from = from.unwrap_or(0);
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
        if from < 0 {
            return Err(AppError::Validation("Parameter 'from' must not be negative".to_string()));
        }
        if size <= 0 {
            return Err(AppError::Validation("Parameter 'size' must be positive".to_string()));
        }
        Ok(Self { from, size })
    }

    /// Apply the window to an already ordered list
    pub fn slice<T>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter()
            .skip(self.from as usize)
            .take(self.size as usize)
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { from: 0, size: DEFAULT_PAGE_SIZE }
    }
}

/// `from` / `size` query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Index of the first row to return (default 0)
    pub from: Option<i64>,
    /// Maximum number of rows (default 10)
    pub size: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> AppResult<Page> {
        Page::new(self.from, self.size)
    }
}

/// Validator rejecting empty and whitespace-only strings
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
