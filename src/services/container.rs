//! Service container - centralized service access.
//!
//! Wires repositories, the mailer and the token codec into the two
//! application services and hands out `Arc` handles for the API layer.

use std::sync::Arc;

use super::{ApplicationService, AuthService, Authenticator, JobBoard, TokenCodec};
use crate::config::Config;
use crate::infra::{ApplicationStore, Mailer, SessionStore, UserStore};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get job application service
    fn applications(&self) -> Arc<dyn ApplicationService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    application_service: Arc<dyn ApplicationService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        application_service: Arc<dyn ApplicationService>,
    ) -> Self {
        Self {
            auth_service,
            application_service,
        }
    }

    /// Create service container from a database connection, mailer and config
    pub fn from_connection(
        db: Arc<sea_orm::DatabaseConnection>,
        mailer: Arc<dyn Mailer>,
        config: &Config,
    ) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let sessions = Arc::new(SessionStore::new(db.clone()));
        let applications = Arc::new(ApplicationStore::new(db));

        let auth_service = Arc::new(Authenticator::new(
            users.clone(),
            sessions,
            mailer,
            TokenCodec::new(config),
            config.app_url.clone(),
        ));
        let application_service = Arc::new(JobBoard::new(applications, users));

        Self {
            auth_service,
            application_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn applications(&self) -> Arc<dyn ApplicationService> {
        self.application_service.clone()
    }
}
