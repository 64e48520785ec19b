//! Overdue record store port

use async_trait::async_trait;

use crate::{error::EngineResult, models::loan::OverdueRecord};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OverdueRecordPort: Send + Sync {
    /// Persist a late-return record; at most one per loan
    async fn create(&self, loan_id: i32, overdue_days: i64) -> EngineResult<OverdueRecord>;
}
