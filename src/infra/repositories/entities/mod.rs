//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod job_application;
pub mod refresh_session;
pub mod user;
