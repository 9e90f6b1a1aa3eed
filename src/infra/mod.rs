//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Outbound email (SMTP)

pub mod db;
pub mod mailer;
pub mod repositories;

pub use db::{Database, Migrator};
pub use mailer::{Mailer, SmtpMailer};
pub use repositories::{
    ApplicationRepository, ApplicationStore, SessionRepository, SessionStore, UserRepository,
    UserStore,
};
