//! Service layer - business logic behind the HTTP handlers.

pub mod application_service;
pub mod auth_service;
pub mod container;
pub mod token_service;

pub use application_service::{AnalyticsResponse, ApplicationService, JobBoard};
pub use auth_service::{AuthService, Authenticator, LoginResponse};
pub use container::{ServiceContainer, Services};
pub use token_service::{AccessClaims, RefreshClaims, TokenCodec, TokenPair};
