//! Domain models for the circulation engine

pub mod book;
pub mod loan;
pub mod reservation;
pub mod user;
