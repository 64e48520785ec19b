//! Book and copy models

use serde::{Deserialize, Serialize};

/// Catalog entry. Immutable for the circulation core; catalog management
/// lives elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub category: String,
}

/// Physical copy of a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Copy {
    pub id: i32,
    pub book_id: i32,
    pub status: CopyStatus,
}

/// Copy lifecycle status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum CopyStatus {
    Available = 0,
    Borrowed = 1,
    Reserved = 2,
    Maintenance = 3,
}

impl CopyStatus {
    /// Only available copies may be admitted into a loan
    pub fn is_loanable(&self) -> bool {
        matches!(self, CopyStatus::Available)
    }
}

impl From<i16> for CopyStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => CopyStatus::Borrowed,
            2 => CopyStatus::Reserved,
            3 => CopyStatus::Maintenance,
            _ => CopyStatus::Available,
        }
    }
}

impl From<CopyStatus> for i16 {
    fn from(s: CopyStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CopyStatus::Available => "Available",
            CopyStatus::Borrowed => "Borrowed",
            CopyStatus::Reserved => "Reserved",
            CopyStatus::Maintenance => "Maintenance",
        };
        write!(f, "{}", label)
    }
}
