//! ShareIt
//!
//! Backend for a peer-to-peer item lending service: users list items,
//! book items owned by others, comment after use and post requests for
//! items nobody offers yet. Exposed as a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
