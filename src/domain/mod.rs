//! Domain layer - Core business entities and logic
//!
//! Contains the business concepts independent of infrastructure
//! concerns: entities, value objects, and their invariants.

pub mod application;
pub mod password;
pub mod session;
pub mod user;

pub use application::{
    ApplicationFilter, ApplicationStatus, ApplicationUpdate, JobApplication, MonthlyCount,
    NewApplication, SortField, SortOrder, StatusCount,
};
pub use password::Password;
pub use session::RefreshSession;
pub use user::{AdminUserResponse, User, UserResponse, UserRole};
