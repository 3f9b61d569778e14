//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod club;
pub mod event;
pub mod registration;

// Re-export commonly used services
pub use auth::{AuthService, Claims};
pub use club::ClubService;
pub use event::{EventPage, EventService};
pub use registration::{RegisterOutcome, RegistrationService};

use crate::config::settings::Settings;
use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub event_service: EventService,
    pub registration_service: RegistrationService,
    pub club_service: ClubService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, database: &DatabaseService) -> Self {
        let auth_service = AuthService::new(database.users.clone(), settings);
        let event_service = EventService::new(
            database.events.clone(),
            database.registrations.clone(),
        );
        let registration_service = RegistrationService::new(
            database.pool.clone(),
            database.events.clone(),
            database.registrations.clone(),
        );
        let club_service = ClubService::new(database.clubs.clone());

        Self {
            auth_service,
            event_service,
            registration_service,
            club_service,
        }
    }
}
