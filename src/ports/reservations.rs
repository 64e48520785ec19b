//! Reservation store port

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::EngineResult,
    models::reservation::{CreateReservation, Reservation, ReservationStatus},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationPort: Send + Sync {
    /// Persist a new pending reservation at the given queue position
    async fn create(
        &self,
        input: CreateReservation,
        queue_position: i32,
    ) -> EngineResult<Reservation>;

    async fn find_by_id(&self, reservation_id: i32) -> EngineResult<Option<Reservation>>;

    /// Active reservations for a book, ordered by queue position ascending
    async fn find_active_by_book_id(&self, book_id: i32) -> EngineResult<Vec<Reservation>>;

    async fn count_active_by_book_id(&self, book_id: i32) -> EngineResult<i64>;

    /// Whether the user already holds an active reservation for the book
    async fn has_active_reservation(&self, user_id: i32, book_id: i32) -> EngineResult<bool>;

    /// Update status and notification timestamps, returning the updated row
    async fn update_status(
        &self,
        reservation_id: i32,
        status: ReservationStatus,
        notified_at: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
    ) -> EngineResult<Reservation>;

    /// Notified reservations whose `expires_at` is in the past
    async fn find_expired_reservations(&self) -> EngineResult<Vec<Reservation>>;
}
