//! Reservation model and status state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Reservation status codes.
///
/// `Pending` and `Notified` are the only non-terminal states. Transitions:
/// `Pending -> Notified` (promotion), `Notified -> Expired` (sweep),
/// `Pending | Notified -> Cancelled`, `Notified -> Fulfilled` (the patron
/// borrows; triggered by an external loan flow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum ReservationStatus {
    Pending = 0,
    Notified = 1,
    Fulfilled = 2,
    Expired = 3,
    Cancelled = 4,
}

impl ReservationStatus {
    /// Active reservations occupy a queue position
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Notified)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Whether moving to `next` is a legal state machine step
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Notified)
                | (Pending, Cancelled)
                | (Notified, Expired)
                | (Notified, Cancelled)
                | (Notified, Fulfilled)
        )
    }

    /// Guarded transition; illegal moves are rejected with a validation error
    pub fn transition_to(&self, next: ReservationStatus) -> EngineResult<ReservationStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(EngineError::Validation {
                field: "status",
                message: format!("illegal reservation transition {} -> {}", self, next),
            })
        }
    }
}

impl From<i16> for ReservationStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => ReservationStatus::Notified,
            2 => ReservationStatus::Fulfilled,
            3 => ReservationStatus::Expired,
            4 => ReservationStatus::Cancelled,
            _ => ReservationStatus::Pending,
        }
    }
}

impl From<ReservationStatus> for i16 {
    fn from(s: ReservationStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Notified => "Notified",
            ReservationStatus::Fulfilled => "Fulfilled",
            ReservationStatus::Expired => "Expired",
            ReservationStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", label)
    }
}

/// Place in a book's waiting list.
///
/// The queue itself is never materialized in memory; it is reconstructed on
/// demand by ordering active reservations on `queue_position`. Positions are
/// assigned at creation and never renumbered afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub reserved_at: DateTime<Utc>,
    pub notified_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: ReservationStatus,
    /// 1-based rank among active reservations at creation time
    pub queue_position: i32,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Input for creating a reservation; the store assigns the id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservation {
    pub user_id: i32,
    pub book_id: i32,
    pub reserved_at: DateTime<Utc>,
}

/// Outcome of one expiry sweep pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub expired_count: usize,
    /// Reservations promoted to Notified by the cascade, one at most per book
    pub next_notified: Vec<Reservation>,
}
