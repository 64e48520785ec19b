//! Book and copy store port

use async_trait::async_trait;

use crate::{
    error::EngineResult,
    models::book::{Book, Copy, CopyStatus},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookPort: Send + Sync {
    async fn find_by_id(&self, book_id: i32) -> EngineResult<Option<Book>>;

    async fn find_copy_by_id(&self, copy_id: i32) -> EngineResult<Option<Copy>>;

    /// All copies of a book, whatever their status
    async fn find_copies_by_book_id(&self, book_id: i32) -> EngineResult<Vec<Copy>>;

    async fn update_copy_status(&self, copy_id: i32, status: CopyStatus) -> EngineResult<()>;
}
