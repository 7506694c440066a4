//! Booking lifecycle service

use crate::{
    config::RulesConfig,
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingState, BookingStatus, CreateBooking, NewBooking},
        Page,
    },
    repository::Repository,
};

use super::now;

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    rules: RulesConfig,
}

impl BookingsService {
    pub fn new(repository: Repository, rules: RulesConfig) -> Self {
        Self { repository, rules }
    }

    /// Request a booking of someone else's item; the booking starts in WAITING
    pub async fn create_booking(&self, booker_id: i64, request: CreateBooking) -> AppResult<Booking> {
        let (start, end) = match (request.start, request.end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(AppError::Validation(
                    "Booking start and end must both be set".to_string(),
                ))
            }
        };
        let item_id = request
            .item_id
            .ok_or_else(|| AppError::Validation("Booking itemId must be set".to_string()))?;

        if start < now() {
            return Err(AppError::Validation("Booking start must not be in the past".to_string()));
        }
        if end <= start {
            return Err(AppError::Validation("Booking end must be after its start".to_string()));
        }

        self.repository.users.get_by_id(booker_id).await?;
        let item = self.repository.items.get_by_id(item_id).await?;

        if item.owner_id == booker_id {
            tracing::debug!(item_id, booker_id, "Owner tried to book own item");
            return Err(AppError::NotFound(format!(
                "Item with id {} cannot be booked by its owner",
                item_id
            )));
        }
        if !item.available {
            return Err(AppError::Validation(format!("Item with id {} is not available", item_id)));
        }

        if self.rules.reject_overlapping_bookings {
            let existing = self.repository.bookings.list_by_items(&[item_id]).await?;
            if let Some(clash) = existing.iter().find(|b| b.is_approved() && b.overlaps(start, end)) {
                tracing::debug!(item_id, clash = clash.id, "Booking window overlaps an approved booking");
                return Err(AppError::Validation(format!(
                    "Item with id {} is already booked for this period",
                    item_id
                )));
            }
        }

        let booking = self
            .repository
            .bookings
            .create(&NewBooking {
                item_id,
                booker_id,
                start_date: start,
                end_date: end,
            })
            .await?;

        tracing::info!(booking_id = booking.id, item_id, booker_id, "Booking created");
        Ok(booking)
    }

    /// Approve or reject a booking of one of `owner_id`'s items
    pub async fn set_approval(&self, owner_id: i64, booking_id: i64, approved: bool) -> AppResult<Booking> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;

        if booking.item_owner_id != owner_id {
            return Err(AppError::NotFound(format!("Booking with id {} not found", booking_id)));
        }
        if booking.status == BookingStatus::Approved {
            return Err(AppError::Validation(format!(
                "Booking with id {} is already approved",
                booking_id
            )));
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        let updated = self.repository.bookings.update_status(booking_id, status).await?;

        tracing::info!(booking_id, owner_id, status = %status, "Booking status changed");
        Ok(updated)
    }

    /// Get a booking as seen by its booker or the item's owner
    pub async fn get_booking(&self, user_id: i64, booking_id: i64) -> AppResult<Booking> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;
        if !booking.is_visible_to(user_id) {
            return Err(AppError::NotFound(format!("Booking with id {} not found", booking_id)));
        }
        Ok(booking)
    }

    /// Bookings made by `booker_id` in the given state bucket
    pub async fn list_by_booker(&self, booker_id: i64, state: Option<&str>, page: Page) -> AppResult<Vec<Booking>> {
        let state = BookingState::parse(state)?;
        self.repository.users.get_by_id(booker_id).await?;
        let bookings = self.repository.bookings.list_by_booker(booker_id).await?;
        Ok(page.slice(state.select(bookings, now())))
    }

    /// Bookings of items owned by `owner_id` in the given state bucket
    pub async fn list_by_owner(&self, owner_id: i64, state: Option<&str>, page: Page) -> AppResult<Vec<Booking>> {
        let state = BookingState::parse(state)?;
        self.repository.users.get_by_id(owner_id).await?;
        let bookings = self.repository.bookings.list_by_owner(owner_id).await?;
        Ok(page.slice(state.select(bookings, now())))
    }
}
