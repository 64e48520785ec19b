//! Store ports consumed by the engine.
//!
//! Concrete implementations (SQL, in-memory, ...) live outside this crate;
//! the engine only sees these traits. Lookups return `Ok(None)` when the row
//! is absent, the services map absence onto the not-found error class.

pub mod books;
pub mod loans;
pub mod overdue;
pub mod reservations;
pub mod users;

use std::sync::Arc;

pub use books::BookPort;
pub use loans::LoanPort;
pub use overdue::OverdueRecordPort;
pub use reservations::ReservationPort;
pub use users::UserPort;

/// Container holding one handle per store port
#[derive(Clone)]
pub struct Ports {
    pub books: Arc<dyn BookPort>,
    pub users: Arc<dyn UserPort>,
    pub loans: Arc<dyn LoanPort>,
    pub reservations: Arc<dyn ReservationPort>,
    pub overdue: Arc<dyn OverdueRecordPort>,
}

impl Ports {
    pub fn new(
        books: Arc<dyn BookPort>,
        users: Arc<dyn UserPort>,
        loans: Arc<dyn LoanPort>,
        reservations: Arc<dyn ReservationPort>,
        overdue: Arc<dyn OverdueRecordPort>,
    ) -> Self {
        Self {
            books,
            users,
            loans,
            reservations,
            overdue,
        }
    }
}
