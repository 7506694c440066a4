//! Bookings repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, BookingStatus, NewBooking},
};

/// Bookings joined with the item they reserve and the user who booked
const BOOKING_SELECT: &str = r#"
    SELECT b.id, b.start_date, b.end_date,
           b.item_id, i.name AS item_name, i.owner_id AS item_owner_id,
           b.booker_id, u.name AS booker_name,
           b.status
    FROM bookings b
    JOIN items i ON b.item_id = i.id
    JOIN users u ON b.booker_id = u.id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingsRepository: Send + Sync {
    /// Fails with `NotFound` when no booking has this id
    async fn get_by_id(&self, id: i64) -> AppResult<Booking>;

    /// Store a new booking in WAITING
    async fn create(&self, booking: &NewBooking) -> AppResult<Booking>;

    async fn update_status(&self, id: i64, status: BookingStatus) -> AppResult<Booking>;

    /// Every booking made by `booker_id`, unordered
    async fn list_by_booker(&self, booker_id: i64) -> AppResult<Vec<Booking>>;

    /// Every booking of items owned by `owner_id`, unordered
    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Booking>>;

    /// Every booking of the given items, unordered
    async fn list_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>>;
}

#[derive(Clone)]
pub struct PgBookingsRepository {
    pool: Pool<Postgres>,
}

impl PgBookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingsRepository for PgBookingsRepository {
    async fn get_by_id(&self, id: i64) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(&format!("{} WHERE b.id = $1", BOOKING_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }

    async fn create(&self, booking: &NewBooking) -> AppResult<Booking> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.item_id)
        .bind(booking.booker_id)
        .bind(BookingStatus::Waiting)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    async fn update_status(&self, id: i64, status: BookingStatus) -> AppResult<Booking> {
        let result = sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Booking with id {} not found", id)));
        }
        self.get_by_id(id).await
    }

    async fn list_by_booker(&self, booker_id: i64) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!("{} WHERE b.booker_id = $1", BOOKING_SELECT))
            .bind(booker_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!("{} WHERE i.owner_id = $1", BOOKING_SELECT))
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let bookings = sqlx::query_as::<_, Booking>(&format!("{} WHERE b.item_id = ANY($1)", BOOKING_SELECT))
            .bind(item_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }
}
