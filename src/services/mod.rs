//! Business logic services

pub mod bookings;
pub mod items;
pub mod requests;
pub mod users;

use chrono::{NaiveDateTime, Utc};

use crate::{config::RulesConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub items: items::ItemsService,
    pub bookings: bookings::BookingsService,
    pub requests: requests::ItemRequestsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, rules: RulesConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone()),
            items: items::ItemsService::new(repository.clone(), rules.clone()),
            bookings: bookings::BookingsService::new(repository.clone(), rules),
            requests: requests::ItemRequestsService::new(repository),
        }
    }
}

/// Current UTC time without offset, as stored in the database
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixtures shared by the service tests

    use std::sync::Arc;

    use chrono::{Duration, NaiveDateTime};

    use crate::{
        models::{Booking, BookingStatus, Item, User},
        repository::{
            bookings::MockBookingsRepository, comments::MockCommentsRepository,
            items::MockItemsRepository, requests::MockRequestsRepository,
            users::MockUsersRepository, Repository,
        },
    };

    /// One mock per aggregate, turned into a [`Repository`] once expectations are set
    #[derive(Default)]
    pub struct Mocks {
        pub users: MockUsersRepository,
        pub items: MockItemsRepository,
        pub bookings: MockBookingsRepository,
        pub comments: MockCommentsRepository,
        pub requests: MockRequestsRepository,
    }

    impl Mocks {
        pub fn into_repository(self) -> Repository {
            Repository {
                users: Arc::new(self.users),
                items: Arc::new(self.items),
                bookings: Arc::new(self.bookings),
                comments: Arc::new(self.comments),
                requests: Arc::new(self.requests),
            }
        }
    }

    pub fn user(id: i64) -> User {
        User {
            id,
            name: format!("user{}", id),
            email: format!("user{}@example.com", id),
        }
    }

    pub fn item(id: i64, owner_id: i64, available: bool) -> Item {
        Item {
            id,
            name: "Drill".to_string(),
            description: "Cordless drill".to_string(),
            available,
            owner_id,
            request_id: None,
        }
    }

    /// Booking of `item` (owner 9) by `booker_id`, window relative to `now` in hours
    pub fn booking(
        id: i64,
        booker_id: i64,
        now: NaiveDateTime,
        start_h: i64,
        end_h: i64,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id,
            start_date: now + Duration::hours(start_h),
            end_date: now + Duration::hours(end_h),
            item_id: 5,
            item_name: "Drill".to_string(),
            item_owner_id: 9,
            booker_id,
            booker_name: format!("user{}", booker_id),
            status,
        }
    }
}
