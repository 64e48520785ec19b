//! Loan (borrow) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Loan record. Active while `returned_at` is `None`; loans are never
/// deleted, a return fills `returned_at` exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: i32,
    pub user_id: i32,
    pub copy_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// Input for creating a loan; the store assigns the id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoan {
    pub user_id: i32,
    pub copy_id: i32,
    pub borrowed_at: DateTime<Utc>,
}

/// Loan admission result enriched for desk display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanReceipt {
    pub loan: Loan,
    pub book_title: String,
    pub user_name: String,
}

/// Late-return record, created at most once per loan when a return
/// postdates the due date. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverdueRecord {
    pub id: i32,
    pub loan_id: i32,
    /// Full days past due, rounded up; strictly positive
    pub overdue_days: i64,
    pub recorded_at: DateTime<Utc>,
}

/// Outcome of a return.
///
/// `overdue_days` may be present without `overdue_record`: the record write
/// is allowed to fail without failing the return itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnOutcome {
    pub loan: Loan,
    pub is_overdue: bool,
    pub overdue_days: Option<i64>,
    pub overdue_record: Option<OverdueRecord>,
}
