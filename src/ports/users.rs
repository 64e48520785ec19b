//! User store port

use async_trait::async_trait;

use crate::{error::EngineResult, models::user::User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserPort: Send + Sync {
    async fn find_by_id(&self, user_id: i32) -> EngineResult<Option<User>>;
}
