//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod application_repository;
pub(crate) mod entities;
mod session_repository;
mod user_repository;

pub use application_repository::{ApplicationRepository, ApplicationStore};
pub use session_repository::{SessionRepository, SessionStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for service unit tests
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
