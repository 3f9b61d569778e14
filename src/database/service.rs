//! Database service layer
//!
//! Bundles the connection pool with all repositories so callers wire up
//! one value at startup.

use crate::database::{
    ClubRepository, DatabasePool, EventRepository, RegistrationRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub pool: DatabasePool,
    pub users: UserRepository,
    pub clubs: ClubRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            clubs: ClubRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            pool,
        }
    }
}
