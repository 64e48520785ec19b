//! In-memory store backing the lifecycle tests.
//!
//! Implements every engine port over one mutex-guarded state map and adds
//! the hooks the scenarios need: seeding, backdating of due and expiry
//! dates, and write-failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use circulation_engine::error::{EngineError, EngineResult};
use circulation_engine::models::{
    book::{Book, Copy, CopyStatus},
    loan::{CreateLoan, Loan, OverdueRecord},
    reservation::{CreateReservation, Reservation, ReservationStatus},
    user::User,
};
use circulation_engine::ports::{
    BookPort, LoanPort, OverdueRecordPort, Ports, ReservationPort, UserPort,
};
use circulation_engine::{CirculationConfig, Services};

#[derive(Default)]
struct State {
    books: HashMap<i32, Book>,
    copies: HashMap<i32, Copy>,
    users: HashMap<i32, User>,
    loans: HashMap<i32, Loan>,
    reservations: HashMap<i32, Reservation>,
    overdue: HashMap<i32, OverdueRecord>,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    pub fail_overdue_writes: AtomicBool,
    pub fail_copy_updates: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ---- seeding -------------------------------------------------------

    pub fn add_user(&self, name: &str, loan_limit: i32) -> i32 {
        let mut state = self.lock();
        let id = state.next_id();
        state.users.insert(
            id,
            User {
                id,
                name: name.to_string(),
                loan_limit,
            },
        );
        id
    }

    pub fn add_book(&self, title: &str) -> i32 {
        let mut state = self.lock();
        let id = state.next_id();
        state.books.insert(
            id,
            Book {
                id,
                title: title.to_string(),
                author: "anon".to_string(),
                category: "general".to_string(),
            },
        );
        id
    }

    pub fn add_copy(&self, book_id: i32, status: CopyStatus) -> i32 {
        let mut state = self.lock();
        let id = state.next_id();
        state.copies.insert(id, Copy { id, book_id, status });
        id
    }

    // ---- inspection and clock tricks -----------------------------------

    pub fn copy_status(&self, copy_id: i32) -> CopyStatus {
        self.lock().copies[&copy_id].status
    }

    pub fn loan(&self, loan_id: i32) -> Loan {
        self.lock().loans[&loan_id].clone()
    }

    pub fn reservation(&self, reservation_id: i32) -> Reservation {
        self.lock().reservations[&reservation_id].clone()
    }

    pub fn overdue_records_for(&self, loan_id: i32) -> Vec<OverdueRecord> {
        self.lock()
            .overdue
            .values()
            .filter(|r| r.loan_id == loan_id)
            .cloned()
            .collect()
    }

    pub fn active_reservations(&self, book_id: i32) -> Vec<Reservation> {
        let mut active: Vec<Reservation> = self
            .lock()
            .reservations
            .values()
            .filter(|r| r.book_id == book_id && r.is_active())
            .cloned()
            .collect();
        active.sort_by_key(|r| (r.queue_position, r.id));
        active
    }

    /// Backdate a loan so a test can exercise the overdue path
    pub fn backdate_due_date(&self, loan_id: i32, due_date: DateTime<Utc>) {
        let mut state = self.lock();
        if let Some(loan) = state.loans.get_mut(&loan_id) {
            loan.due_date = due_date;
        }
    }

    /// Backdate a notification so a test can exercise the sweep
    pub fn backdate_expiry(&self, reservation_id: i32, expires_at: DateTime<Utc>) {
        let mut state = self.lock();
        if let Some(reservation) = state.reservations.get_mut(&reservation_id) {
            reservation.expires_at = Some(expires_at);
        }
    }

    /// Force a reservation straight into Notified with the given expiry,
    /// bypassing the engine; for sweep scenarios that need several lapsed
    /// notifications on one book
    pub fn force_notify(&self, reservation_id: i32, expires_at: DateTime<Utc>) {
        let mut state = self.lock();
        if let Some(reservation) = state.reservations.get_mut(&reservation_id) {
            reservation.status = ReservationStatus::Notified;
            reservation.notified_at = Some(expires_at - chrono::Duration::days(7));
            reservation.expires_at = Some(expires_at);
        }
    }
}

#[async_trait]
impl BookPort for MemoryStore {
    async fn find_by_id(&self, book_id: i32) -> EngineResult<Option<Book>> {
        Ok(self.lock().books.get(&book_id).cloned())
    }

    async fn find_copy_by_id(&self, copy_id: i32) -> EngineResult<Option<Copy>> {
        Ok(self.lock().copies.get(&copy_id).cloned())
    }

    async fn find_copies_by_book_id(&self, book_id: i32) -> EngineResult<Vec<Copy>> {
        Ok(self
            .lock()
            .copies
            .values()
            .filter(|c| c.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn update_copy_status(&self, copy_id: i32, status: CopyStatus) -> EngineResult<()> {
        if self.fail_copy_updates.load(Ordering::SeqCst) {
            return Err(EngineError::Store("copy update rejected".to_string()));
        }
        let mut state = self.lock();
        let copy = state
            .copies
            .get_mut(&copy_id)
            .ok_or(EngineError::CopyNotFound(copy_id))?;
        copy.status = status;
        Ok(())
    }
}

#[async_trait]
impl UserPort for MemoryStore {
    async fn find_by_id(&self, user_id: i32) -> EngineResult<Option<User>> {
        Ok(self.lock().users.get(&user_id).cloned())
    }
}

#[async_trait]
impl LoanPort for MemoryStore {
    async fn create(&self, input: CreateLoan, due_date: DateTime<Utc>) -> EngineResult<Loan> {
        let mut state = self.lock();
        let id = state.next_id();
        let loan = Loan {
            id,
            user_id: input.user_id,
            copy_id: input.copy_id,
            borrowed_at: input.borrowed_at,
            due_date,
            returned_at: None,
        };
        state.loans.insert(id, loan.clone());
        Ok(loan)
    }

    async fn find_by_id(&self, loan_id: i32) -> EngineResult<Option<Loan>> {
        Ok(self.lock().loans.get(&loan_id).cloned())
    }

    async fn count_active_loans(&self, user_id: i32) -> EngineResult<i64> {
        Ok(self
            .lock()
            .loans
            .values()
            .filter(|l| l.user_id == user_id && l.is_active())
            .count() as i64)
    }

    async fn update_returned_at(&self, loan_id: i32, when: DateTime<Utc>) -> EngineResult<Loan> {
        let mut state = self.lock();
        let loan = state
            .loans
            .get_mut(&loan_id)
            .ok_or(EngineError::LoanNotFound(loan_id))?;
        loan.returned_at = Some(when);
        Ok(loan.clone())
    }

    async fn find_active_by_copy_id(&self, copy_id: i32) -> EngineResult<Option<Loan>> {
        Ok(self
            .lock()
            .loans
            .values()
            .find(|l| l.copy_id == copy_id && l.is_active())
            .cloned())
    }
}

#[async_trait]
impl ReservationPort for MemoryStore {
    async fn create(
        &self,
        input: CreateReservation,
        queue_position: i32,
    ) -> EngineResult<Reservation> {
        let mut state = self.lock();
        let id = state.next_id();
        let reservation = Reservation {
            id,
            user_id: input.user_id,
            book_id: input.book_id,
            reserved_at: input.reserved_at,
            notified_at: None,
            expires_at: None,
            status: ReservationStatus::Pending,
            queue_position,
        };
        state.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, reservation_id: i32) -> EngineResult<Option<Reservation>> {
        Ok(self.lock().reservations.get(&reservation_id).cloned())
    }

    async fn find_active_by_book_id(&self, book_id: i32) -> EngineResult<Vec<Reservation>> {
        Ok(self.active_reservations(book_id))
    }

    async fn count_active_by_book_id(&self, book_id: i32) -> EngineResult<i64> {
        Ok(self.active_reservations(book_id).len() as i64)
    }

    async fn has_active_reservation(&self, user_id: i32, book_id: i32) -> EngineResult<bool> {
        Ok(self
            .lock()
            .reservations
            .values()
            .any(|r| r.user_id == user_id && r.book_id == book_id && r.is_active()))
    }

    async fn update_status(
        &self,
        reservation_id: i32,
        status: ReservationStatus,
        notified_at: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
    ) -> EngineResult<Reservation> {
        let mut state = self.lock();
        let reservation = state
            .reservations
            .get_mut(&reservation_id)
            .ok_or(EngineError::ReservationNotFound(reservation_id))?;
        reservation.status = status;
        reservation.notified_at = notified_at;
        reservation.expires_at = expires_at;
        Ok(reservation.clone())
    }

    async fn find_expired_reservations(&self) -> EngineResult<Vec<Reservation>> {
        let now = Utc::now();
        Ok(self
            .lock()
            .reservations
            .values()
            .filter(|r| {
                r.status == ReservationStatus::Notified
                    && r.expires_at.map(|e| e < now).unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OverdueRecordPort for MemoryStore {
    async fn create(&self, loan_id: i32, overdue_days: i64) -> EngineResult<OverdueRecord> {
        if self.fail_overdue_writes.load(Ordering::SeqCst) {
            return Err(EngineError::Store("overdue write rejected".to_string()));
        }
        let mut state = self.lock();
        let id = state.next_id();
        let record = OverdueRecord {
            id,
            loan_id,
            overdue_days,
            recorded_at: Utc::now(),
        };
        state.overdue.insert(id, record.clone());
        Ok(record)
    }
}

/// Engine wired over a fresh in-memory store
pub fn engine() -> (Arc<MemoryStore>, Services) {
    // first caller wins, later calls are no-ops
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("circulation_engine=debug")),
        )
        .with_test_writer()
        .try_init();

    let store = MemoryStore::new();
    let ports = Ports::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    let services = Services::new(ports, CirculationConfig::default());
    (store, services)
}
