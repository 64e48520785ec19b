//! User model

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOAN_LIMIT: i32 = 5;

/// Library patron
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    /// Maximum simultaneous active loans, always positive
    pub loan_limit: i32,
}

impl User {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            loan_limit: DEFAULT_LOAN_LIMIT,
        }
    }
}
