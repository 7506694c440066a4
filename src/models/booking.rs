//! Booking model, status lifecycle and state buckets

use std::cmp::Reverse;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::AppError;

/// Booking status as stored in the `bookings.status` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    /// Declared for API compatibility, never produced
    Canceled,
    /// Declared for API compatibility, never produced
    Undefined,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
            BookingStatus::Undefined => "UNDEFINED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELED" => Ok(BookingStatus::Canceled),
            "UNDEFINED" => Ok(BookingStatus::Undefined),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

// SQLx conversion for BookingStatus
impl sqlx::Type<Postgres> for BookingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BookingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Booking joined with the item and booker it references
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Booking {
    pub id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub item_id: i64,
    pub item_name: String,
    pub item_owner_id: i64,
    pub booker_id: i64,
    pub booker_name: String,
    pub status: BookingStatus,
}

impl Booking {
    /// start <= now < end
    pub fn is_current(&self, now: NaiveDateTime) -> bool {
        self.start_date <= now && now < self.end_date
    }

    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.end_date < now
    }

    pub fn is_future(&self, now: NaiveDateTime) -> bool {
        self.start_date > now
    }

    /// Strictly inside the window, bounds excluded
    pub fn is_in_progress(&self, now: NaiveDateTime) -> bool {
        self.start_date < now && now < self.end_date
    }

    /// Half-open windows [start, end) intersect
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_date < end && start < self.end_date
    }

    pub fn is_approved(&self) -> bool {
        self.status == BookingStatus::Approved
    }

    /// Whether `user_id` is allowed to see this booking
    pub fn is_visible_to(&self, user_id: i64) -> bool {
        self.booker_id == user_id || self.item_owner_id == user_id
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookerRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookedItemRef {
    pub id: i64,
    pub name: String,
}

/// Booking as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub booker: BookerRef,
    pub item: BookedItemRef,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            start: b.start_date,
            end: b.end_date,
            status: b.status,
            booker: BookerRef {
                id: b.booker_id,
                name: b.booker_name,
            },
            item: BookedItemRef {
                id: b.item_id,
                name: b.item_name,
            },
        }
    }
}

/// Compact booking reference embedded in item details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingShort {
    pub id: i64,
    pub booker_id: i64,
}

impl From<&Booking> for BookingShort {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id,
            booker_id: b.booker_id,
        }
    }
}

/// Latest approved booking that already started and earliest approved one still to come
pub fn last_and_next(
    bookings: &[Booking],
    item_id: i64,
    now: NaiveDateTime,
) -> (Option<BookingShort>, Option<BookingShort>) {
    let approved = || {
        bookings
            .iter()
            .filter(move |b| b.item_id == item_id && b.is_approved())
    };

    let last = approved()
        .filter(|b| b.start_date < now)
        .max_by_key(|b| b.start_date)
        .map(BookingShort::from);
    let next = approved()
        .filter(|b| b.start_date > now)
        .min_by_key(|b| b.start_date)
        .map(BookingShort::from);

    (last, next)
}

/// Create booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    #[validate(required(message = "must be set"))]
    pub item_id: Option<i64>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Validated booking ready to be stored in WAITING
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub item_id: i64,
    pub booker_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

/// Query parameters for booking approval
#[derive(Debug, Deserialize, IntoParams)]
pub struct ApprovalQuery {
    /// true to approve, false to reject
    pub approved: bool,
}

/// Query parameters for booking lists
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookingListQuery {
    /// ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED (default ALL)
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Bucket used to filter a user's bookings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl std::str::FromStr for BookingState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(AppError::Validation(format!("Unknown state: {}", s))),
        }
    }
}

impl BookingState {
    /// Parse an optional query value, defaulting to ALL
    pub fn parse(value: Option<&str>) -> Result<Self, AppError> {
        value.map_or(Ok(BookingState::All), |s| s.parse())
    }

    fn matches(&self, booking: &Booking, now: NaiveDateTime) -> bool {
        match self {
            BookingState::All => true,
            BookingState::Current => booking.is_current(now),
            BookingState::Past => booking.is_past(now),
            BookingState::Future => booking.is_future(now),
            BookingState::Waiting => booking.status == BookingStatus::Waiting,
            BookingState::Rejected => booking.status == BookingStatus::Rejected,
        }
    }

    /// Keep the bookings in this bucket and order them for display
    pub fn select(&self, bookings: Vec<Booking>, now: NaiveDateTime) -> Vec<Booking> {
        let mut selected: Vec<Booking> = bookings
            .into_iter()
            .filter(|b| self.matches(b, now))
            .collect();

        // Ties fall back to id so that paging is stable
        match self {
            BookingState::Current => selected.sort_by_key(|b| (b.start_date, b.id)),
            BookingState::Past => selected.sort_by_key(|b| Reverse((b.end_date, b.id))),
            _ => selected.sort_by_key(|b| Reverse((b.start_date, b.id))),
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn booking(id: i64, start_h: i64, end_h: i64, status: BookingStatus) -> Booking {
        Booking {
            id,
            start_date: now() + Duration::hours(start_h),
            end_date: now() + Duration::hours(end_h),
            item_id: 5,
            item_name: "Drill".to_string(),
            item_owner_id: 9,
            booker_id: 3,
            booker_name: "Bob".to_string(),
            status,
        }
    }

    fn sample() -> Vec<Booking> {
        vec![
            booking(1, -48, -24, BookingStatus::Approved),
            booking(2, -2, 2, BookingStatus::Approved),
            booking(3, -5, 1, BookingStatus::Waiting),
            booking(4, 24, 48, BookingStatus::Rejected),
            booking(5, -10, -1, BookingStatus::Rejected),
            booking(6, 2, 3, BookingStatus::Waiting),
        ]
    }

    fn ids(bookings: &[Booking]) -> Vec<i64> {
        bookings.iter().map(|b| b.id).collect()
    }

    #[test]
    fn current_bookings_ascend_by_start() {
        let selected = BookingState::Current.select(sample(), now());
        assert_eq!(ids(&selected), vec![3, 2]);
        assert!(selected.iter().all(|b| b.is_current(now())));
    }

    #[test]
    fn current_includes_start_bound_and_excludes_end_bound() {
        let starts_now = booking(1, 0, 1, BookingStatus::Waiting);
        let ends_now = booking(2, -1, 0, BookingStatus::Waiting);
        let selected = BookingState::Current.select(vec![starts_now, ends_now], now());
        assert_eq!(ids(&selected), vec![1]);
    }

    #[test]
    fn past_bookings_descend_by_end() {
        let selected = BookingState::Past.select(sample(), now());
        assert_eq!(ids(&selected), vec![5, 1]);
    }

    #[test]
    fn future_and_all_descend_by_start() {
        assert_eq!(ids(&BookingState::Future.select(sample(), now())), vec![4, 6]);
        assert_eq!(
            ids(&BookingState::All.select(sample(), now())),
            vec![4, 6, 2, 3, 5, 1]
        );
    }

    #[test]
    fn status_buckets_filter_by_status() {
        assert_eq!(ids(&BookingState::Waiting.select(sample(), now())), vec![6, 3]);
        assert_eq!(ids(&BookingState::Rejected.select(sample(), now())), vec![4, 5]);
    }

    #[test]
    fn state_parsing() {
        assert_eq!(BookingState::parse(None).unwrap(), BookingState::All);
        assert_eq!(BookingState::parse(Some("current")).unwrap(), BookingState::Current);
        match BookingState::parse(Some("UNSUPPORTED_STATUS")) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Unknown state: UNSUPPORTED_STATUS"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn last_and_next_only_consider_approved_bookings() {
        let bookings = vec![
            booking(1, -48, -24, BookingStatus::Approved),
            booking(2, -2, 2, BookingStatus::Approved),
            booking(3, 1, 2, BookingStatus::Waiting),
            booking(4, 24, 48, BookingStatus::Approved),
            booking(5, 5, 6, BookingStatus::Approved),
        ];
        let (last, next) = last_and_next(&bookings, 5, now());
        assert_eq!(last.map(|b| b.id), Some(2));
        assert_eq!(next.map(|b| b.id), Some(5));

        let (last, next) = last_and_next(&bookings, 42, now());
        assert!(last.is_none() && next.is_none());
    }

    #[test]
    fn overlap_uses_half_open_windows() {
        let b = booking(1, 0, 2, BookingStatus::Approved);
        assert!(b.overlaps(now() + Duration::hours(1), now() + Duration::hours(3)));
        assert!(!b.overlaps(now() + Duration::hours(2), now() + Duration::hours(3)));
        assert!(!b.overlaps(now() - Duration::hours(2), now()));
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("approved".parse::<BookingStatus>().unwrap(), BookingStatus::Approved);
        assert_eq!(BookingStatus::Rejected.to_string(), "REJECTED");
        assert!("LOST".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn response_nests_booker_and_item() {
        let json = serde_json::to_value(BookingResponse::from(booking(7, 1, 2, BookingStatus::Waiting)))
            .unwrap();
        assert_eq!(json["status"], "WAITING");
        assert_eq!(json["booker"]["id"], 3);
        assert_eq!(json["item"]["name"], "Drill");
    }
}
