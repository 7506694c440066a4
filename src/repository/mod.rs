//! Repository layer for database operations
//!
//! Each aggregate has a storage trait and a PostgreSQL implementation. The
//! [`Repository`] container is what services are built from; tests swap the
//! PostgreSQL implementations for mocks.

pub mod bookings;
pub mod comments;
pub mod items;
pub mod requests;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use bookings::BookingsRepository;
pub use comments::CommentsRepository;
pub use items::ItemsRepository;
pub use requests::RequestsRepository;
pub use users::UsersRepository;

/// Main repository struct holding one handle per aggregate
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn UsersRepository>,
    pub items: Arc<dyn ItemsRepository>,
    pub bookings: Arc<dyn BookingsRepository>,
    pub comments: Arc<dyn CommentsRepository>,
    pub requests: Arc<dyn RequestsRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::PgUsersRepository::new(pool.clone())),
            items: Arc::new(items::PgItemsRepository::new(pool.clone())),
            bookings: Arc::new(bookings::PgBookingsRepository::new(pool.clone())),
            comments: Arc::new(comments::PgCommentsRepository::new(pool.clone())),
            requests: Arc::new(requests::PgRequestsRepository::new(pool)),
        }
    }
}
