//! Loan store port

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::EngineResult,
    models::loan::{CreateLoan, Loan},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanPort: Send + Sync {
    /// Persist a new loan with `returned_at` unset; the store assigns the id
    async fn create(&self, input: CreateLoan, due_date: DateTime<Utc>) -> EngineResult<Loan>;

    async fn find_by_id(&self, loan_id: i32) -> EngineResult<Option<Loan>>;

    /// Number of loans of this user with `returned_at` unset
    async fn count_active_loans(&self, user_id: i32) -> EngineResult<i64>;

    /// Set `returned_at`, returning the updated loan
    async fn update_returned_at(&self, loan_id: i32, when: DateTime<Utc>) -> EngineResult<Loan>;

    /// The active loan holding this copy, if any
    async fn find_active_by_copy_id(&self, copy_id: i32) -> EngineResult<Option<Loan>>;
}
