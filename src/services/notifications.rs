//! Reservation promotion and the expiry sweep

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{
    config::LendingConfig,
    error::EngineResult,
    models::reservation::{Reservation, ReservationStatus, SweepOutcome},
    ports::Ports,
    services::locks::{LockKey, LockRegistry},
};

#[derive(Clone)]
pub struct NotificationsService {
    ports: Ports,
    config: LendingConfig,
    locks: Arc<LockRegistry>,
}

impl NotificationsService {
    pub fn new(ports: Ports, config: LendingConfig, locks: Arc<LockRegistry>) -> Self {
        Self {
            ports,
            config,
            locks,
        }
    }

    /// Promote the head of a book's waiting list after a copy came back.
    ///
    /// Returns the newly notified reservation, or `None` when the queue is
    /// empty or its head already holds a live notification. Invoked by the
    /// caller after a successful return, and by the expiry sweep.
    pub async fn process_returned_book(&self, book_id: i32) -> EngineResult<Option<Reservation>> {
        let _book_guard = self.locks.acquire(LockKey::Book(book_id)).await;
        self.promote_head(book_id).await
    }

    async fn promote_head(&self, book_id: i32) -> EngineResult<Option<Reservation>> {
        let queue = self
            .ports
            .reservations
            .find_active_by_book_id(book_id)
            .await?;

        let head = match queue.first() {
            Some(head) => head,
            None => return Ok(None),
        };

        // Active means Pending or Notified; a Notified head keeps its turn
        if head.status != ReservationStatus::Pending {
            return Ok(None);
        }

        let now = Utc::now();
        let next = head.status.transition_to(ReservationStatus::Notified)?;
        let notified = self
            .ports
            .reservations
            .update_status(
                head.id,
                next,
                Some(now),
                Some(now + Duration::days(self.config.notification_expiry_days)),
            )
            .await?;

        tracing::debug!(
            reservation_id = notified.id,
            book_id,
            user_id = notified.user_id,
            "reservation promoted to notified"
        );
        Ok(Some(notified))
    }

    /// Expire stale notifications and cascade promotion.
    ///
    /// Scheduled operation; the trigger lives outside this crate. The sweep
    /// key serializes overlapping runs, and rows that are no longer Notified
    /// by the time they are examined are skipped, so repeat invocations
    /// neither double-expire nor double-promote.
    pub async fn expire_overdue_reservations(&self) -> EngineResult<SweepOutcome> {
        let _sweep_guard = self.locks.acquire(LockKey::Sweep).await;

        let stale = self.ports.reservations.find_expired_reservations().await?;

        let mut expired_count = 0usize;
        let mut touched_books: Vec<i32> = Vec::new();
        for reservation in stale {
            if !reservation
                .status
                .can_transition_to(ReservationStatus::Expired)
            {
                continue;
            }
            self.ports
                .reservations
                .update_status(
                    reservation.id,
                    ReservationStatus::Expired,
                    reservation.notified_at,
                    reservation.expires_at,
                )
                .await?;
            expired_count += 1;
            if !touched_books.contains(&reservation.book_id) {
                touched_books.push(reservation.book_id);
            }
        }

        // One promotion attempt per distinct book, however many of its
        // notifications lapsed this pass
        let mut next_notified = Vec::new();
        for book_id in touched_books {
            if let Some(promoted) = self.process_returned_book(book_id).await? {
                next_notified.push(promoted);
            }
        }

        tracing::info!(
            expired = expired_count,
            promoted = next_notified.len(),
            "reservation expiry sweep finished"
        );
        Ok(SweepOutcome {
            expired_count,
            next_notified,
        })
    }
}
