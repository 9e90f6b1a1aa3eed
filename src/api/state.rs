//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, Mailer};
use crate::services::{ApplicationService, AuthService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Job application service
    pub application_service: Arc<dyn ApplicationService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database, mailer and config.
    pub fn from_config(database: Arc<Database>, mailer: Arc<dyn Mailer>, config: &Config) -> Self {
        let container = Services::from_connection(database.get_connection(), mailer, config);

        Self {
            auth_service: container.auth(),
            application_service: container.applications(),
            database,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        application_service: Arc<dyn ApplicationService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            application_service,
            database,
        }
    }
}
