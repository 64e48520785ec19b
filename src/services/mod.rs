//! Engine services

pub mod loans;
pub mod locks;
pub mod notifications;
pub mod reservations;

use std::sync::Arc;

use crate::{config::CirculationConfig, ports::Ports};

/// Container for all engine services.
///
/// The three services share one lock registry so per-entity serialization
/// holds across the loan and reservation sides.
#[derive(Clone)]
pub struct Services {
    pub loans: loans::LoansService,
    pub reservations: reservations::ReservationsService,
    pub notifications: notifications::NotificationsService,
}

impl Services {
    /// Wire all services over the given ports
    pub fn new(ports: Ports, config: CirculationConfig) -> Self {
        let locks = Arc::new(locks::LockRegistry::new());
        Self {
            loans: loans::LoansService::new(
                ports.clone(),
                config.lending.clone(),
                locks.clone(),
            ),
            reservations: reservations::ReservationsService::new(ports.clone(), locks.clone()),
            notifications: notifications::NotificationsService::new(
                ports,
                config.lending,
                locks,
            ),
        }
    }
}
