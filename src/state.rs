//! Shared application state for the HTTP layer

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::services::ServiceFactory;

/// State handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub database: DatabaseService,
    pub services: ServiceFactory,
}

impl AppState {
    pub fn new(settings: Settings, database: DatabaseService) -> Self {
        let services = ServiceFactory::new(settings.clone(), &database);
        Self {
            settings,
            database,
            services,
        }
    }
}
