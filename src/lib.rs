//! Circulation Engine
//!
//! The loan and reservation lifecycle core of a library management system:
//! loan admission and returns, FIFO per-title waiting lists, promotion of
//! waiting patrons when a copy comes back, and the periodic sweep that
//! expires stale notifications.
//!
//! Persistence, transport and notification delivery live outside this
//! crate; callers implement the [`ports`] traits against their store and
//! drive the [`services::Services`] operations.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;
pub mod services;

pub use config::CirculationConfig;
pub use error::{EngineError, EngineResult, ErrorCode};
pub use services::Services;
