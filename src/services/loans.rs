//! Loan admission and return processing

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    config::LendingConfig,
    error::{EngineError, EngineResult},
    models::{
        book::{Copy, CopyStatus},
        loan::{CreateLoan, Loan, LoanReceipt, ReturnOutcome},
        user::User,
    },
    ports::Ports,
    services::locks::{LockKey, LockRegistry},
};

#[derive(Clone)]
pub struct LoansService {
    ports: Ports,
    config: LendingConfig,
    locks: Arc<LockRegistry>,
}

impl LoansService {
    pub fn new(ports: Ports, config: LendingConfig, locks: Arc<LockRegistry>) -> Self {
        Self {
            ports,
            config,
            locks,
        }
    }

    /// Admit a loan: checks run in a fixed order and short-circuit on the
    /// first failure.
    pub async fn create_loan(&self, user_id: i32, copy_id: i32) -> EngineResult<Loan> {
        let (loan, _, _) = self.admit(user_id, copy_id).await?;
        Ok(loan)
    }

    /// Same admission routine, enriched with the book title and user name
    /// for desk display.
    pub async fn create_loan_with_receipt(
        &self,
        user_id: i32,
        copy_id: i32,
    ) -> EngineResult<LoanReceipt> {
        let (loan, user, copy) = self.admit(user_id, copy_id).await?;

        let book = self
            .ports
            .books
            .find_by_id(copy.book_id)
            .await?
            .ok_or(EngineError::BookNotFound(copy.book_id))?;

        Ok(LoanReceipt {
            loan,
            book_title: book.title,
            user_name: user.name,
        })
    }

    async fn admit(&self, user_id: i32, copy_id: i32) -> EngineResult<(Loan, User, Copy)> {
        // User before copy, always; see locks.rs
        let _user_guard = self.locks.acquire(LockKey::User(user_id)).await;
        let _copy_guard = self.locks.acquire(LockKey::Copy(copy_id)).await;

        let user = self
            .ports
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(EngineError::UserNotFound(user_id))?;

        let current_count = self.ports.loans.count_active_loans(user_id).await?;
        if current_count >= user.loan_limit as i64 {
            return Err(EngineError::LoanLimitExceeded {
                limit: user.loan_limit,
                current_count,
            });
        }

        let copy = self
            .ports
            .books
            .find_copy_by_id(copy_id)
            .await?
            .ok_or(EngineError::CopyNotFound(copy_id))?;

        if !copy.status.is_loanable() {
            return Err(EngineError::BookNotAvailable(copy_id));
        }

        // One active loan per copy, even if the copy status lagged behind
        if self
            .ports
            .loans
            .find_active_by_copy_id(copy_id)
            .await?
            .is_some()
        {
            return Err(EngineError::BookNotAvailable(copy_id));
        }

        let now = Utc::now();
        let due_date = now + Duration::days(self.config.loan_period_days);

        let loan = self
            .ports
            .loans
            .create(
                CreateLoan {
                    user_id,
                    copy_id,
                    borrowed_at: now,
                },
                due_date,
            )
            .await?;

        if let Err(e) = self
            .ports
            .books
            .update_copy_status(copy_id, CopyStatus::Borrowed)
            .await
        {
            // The loan row exists but the copy was never flagged as
            // borrowed; the caller must not treat the loan as committed.
            return Err(EngineError::Validation {
                field: "copy.status",
                message: e.to_string(),
            });
        }

        tracing::info!(loan_id = loan.id, user_id, copy_id, "loan admitted");
        Ok((loan, user, copy))
    }

    /// Close a loan. Detects a late return and records it; the overdue
    /// record write is the only failure this routine swallows.
    ///
    /// Promotion of waiting reservations is a separate call
    /// (`NotificationsService::process_returned_book`); callers composing
    /// the full return use case invoke both.
    pub async fn return_book(&self, loan_id: i32) -> EngineResult<ReturnOutcome> {
        // First fetch only locates the copy to lock on
        let loan = self
            .ports
            .loans
            .find_by_id(loan_id)
            .await?
            .ok_or(EngineError::LoanNotFound(loan_id))?;

        let _copy_guard = self.locks.acquire(LockKey::Copy(loan.copy_id)).await;

        // Re-read under the lock before the returned check
        let loan = self
            .ports
            .loans
            .find_by_id(loan_id)
            .await?
            .ok_or(EngineError::LoanNotFound(loan_id))?;

        if loan.returned_at.is_some() {
            return Err(EngineError::AlreadyReturned(loan_id));
        }

        let now = Utc::now();
        let loan = self.ports.loans.update_returned_at(loan_id, now).await?;
        self.ports
            .books
            .update_copy_status(loan.copy_id, CopyStatus::Available)
            .await?;

        let is_overdue = now > loan.due_date;
        let (overdue_days, overdue_record) = if is_overdue {
            let days = days_overdue(loan.due_date, now);
            match self.ports.overdue.create(loan_id, days).await {
                Ok(record) => (Some(days), Some(record)),
                Err(e) => {
                    // Degraded mode: the return stands, only the record is lost
                    tracing::warn!(
                        loan_id,
                        overdue_days = days,
                        error = %e,
                        "overdue record not persisted, return still accepted"
                    );
                    (Some(days), None)
                }
            }
        } else {
            (None, None)
        };

        tracing::info!(loan_id, is_overdue, "loan returned");
        Ok(ReturnOutcome {
            loan,
            is_overdue,
            overdue_days,
            overdue_record,
        })
    }
}

/// Whole days past due, rounded up; strictly positive for any late return,
/// however small the lateness
fn days_overdue(due_date: DateTime<Utc>, returned_at: DateTime<Utc>) -> i64 {
    let late_ms = (returned_at - due_date).num_milliseconds();
    ((late_ms + 86_399_999) / 86_400_000).max(1)
}
