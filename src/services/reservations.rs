//! Reservation queue management

use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::{EngineError, EngineResult},
    models::reservation::{CreateReservation, Reservation, ReservationStatus},
    ports::Ports,
    services::locks::{LockKey, LockRegistry},
};

#[derive(Clone)]
pub struct ReservationsService {
    ports: Ports,
    locks: Arc<LockRegistry>,
}

impl ReservationsService {
    pub fn new(ports: Ports, locks: Arc<LockRegistry>) -> Self {
        Self { ports, locks }
    }

    /// Join the waiting list of a fully-lent book.
    ///
    /// Reservations exist only to queue for unavailable titles: if any copy
    /// is available the request is refused and the patron should borrow
    /// directly instead.
    pub async fn create_reservation(
        &self,
        user_id: i32,
        book_id: i32,
    ) -> EngineResult<Reservation> {
        let _book_guard = self.locks.acquire(LockKey::Book(book_id)).await;

        self.ports
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))?;

        self.ports
            .books
            .find_by_id(book_id)
            .await?
            .ok_or(EngineError::BookNotFound(book_id))?;

        if self
            .ports
            .reservations
            .has_active_reservation(user_id, book_id)
            .await?
        {
            return Err(EngineError::AlreadyReserved { user_id, book_id });
        }

        let copies = self.ports.books.find_copies_by_book_id(book_id).await?;
        if copies.iter().any(|c| c.status.is_loanable()) {
            return Err(EngineError::BookAvailable(book_id));
        }

        // Positions grow 1..N per book; the count runs under the book lock
        // so two concurrent requests cannot claim the same rank
        let queue_position = self
            .ports
            .reservations
            .count_active_by_book_id(book_id)
            .await? as i32
            + 1;

        let reservation = self
            .ports
            .reservations
            .create(
                CreateReservation {
                    user_id,
                    book_id,
                    reserved_at: Utc::now(),
                },
                queue_position,
            )
            .await?;

        tracing::info!(
            reservation_id = reservation.id,
            user_id,
            book_id,
            queue_position,
            "reservation queued"
        );
        Ok(reservation)
    }

    /// Cancel an active reservation.
    ///
    /// Cancellation neither renumbers the remaining queue nor promotes the
    /// next pending entry; promotion happens only on return or expiry.
    pub async fn cancel_reservation(&self, reservation_id: i32) -> EngineResult<()> {
        // First fetch only locates the book to lock on
        let reservation = self
            .ports
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or(EngineError::ReservationNotFound(reservation_id))?;

        let _book_guard = self.locks.acquire(LockKey::Book(reservation.book_id)).await;

        let reservation = self
            .ports
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or(EngineError::ReservationNotFound(reservation_id))?;

        let next = reservation
            .status
            .transition_to(ReservationStatus::Cancelled)?;
        self.ports
            .reservations
            .update_status(
                reservation_id,
                next,
                reservation.notified_at,
                reservation.expires_at,
            )
            .await?;

        tracing::info!(reservation_id, "reservation cancelled");
        Ok(())
    }
}
