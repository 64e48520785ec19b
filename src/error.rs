//! Error types for the circulation engine

use thiserror::Error;

/// Stable numeric error codes for transport layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    StoreFailure = 3,
    NoSuchUser = 4,
    NoSuchBook = 5,
    NoSuchCopy = 6,
    BookNotAvailable = 7,
    Duplicate = 8,
    MaxBorrowsReached = 11,
    AlreadyReturned = 12,
    NoSuchLoan = 13,
    NoSuchReservation = 14,
    BookAvailable = 15,
    BadValue = 18,
}

/// Main engine error type.
///
/// Every engine operation returns one of these variants explicitly; nothing
/// is thrown or retried internally. Port implementations report their own
/// failures through [`EngineError::Store`].
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("User with id {0} not found")]
    UserNotFound(i32),

    #[error("Book with id {0} not found")]
    BookNotFound(i32),

    #[error("Copy with id {0} not found")]
    CopyNotFound(i32),

    #[error("Loan with id {0} not found")]
    LoanNotFound(i32),

    #[error("Reservation with id {0} not found")]
    ReservationNotFound(i32),

    #[error("Maximum loans reached ({current_count}/{limit})")]
    LoanLimitExceeded { limit: i32, current_count: i64 },

    #[error("Copy {0} is not available for loan")]
    BookNotAvailable(i32),

    #[error("Book {0} has an available copy, reservation refused")]
    BookAvailable(i32),

    #[error("User {user_id} already holds an active reservation for book {book_id}")]
    AlreadyReserved { user_id: i32, book_id: i32 },

    #[error("Loan {0} has already been returned")]
    AlreadyReturned(i32),

    #[error("Validation error on {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Store error: {0}")]
    Store(String),
}

impl EngineError {
    /// Numeric code for this error, for callers that encode responses
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::UserNotFound(_) => ErrorCode::NoSuchUser,
            EngineError::BookNotFound(_) => ErrorCode::NoSuchBook,
            EngineError::CopyNotFound(_) => ErrorCode::NoSuchCopy,
            EngineError::LoanNotFound(_) => ErrorCode::NoSuchLoan,
            EngineError::ReservationNotFound(_) => ErrorCode::NoSuchReservation,
            EngineError::LoanLimitExceeded { .. } => ErrorCode::MaxBorrowsReached,
            EngineError::BookNotAvailable(_) => ErrorCode::BookNotAvailable,
            EngineError::BookAvailable(_) => ErrorCode::BookAvailable,
            EngineError::AlreadyReserved { .. } => ErrorCode::Duplicate,
            EngineError::AlreadyReturned(_) => ErrorCode::AlreadyReturned,
            EngineError::Validation { .. } => ErrorCode::BadValue,
            EngineError::Store(_) => ErrorCode::StoreFailure,
        }
    }

    /// True for the not-found class of errors
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::UserNotFound(_)
                | EngineError::BookNotFound(_)
                | EngineError::CopyNotFound(_)
                | EngineError::LoanNotFound(_)
                | EngineError::ReservationNotFound(_)
        )
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
