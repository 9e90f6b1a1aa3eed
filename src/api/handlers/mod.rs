//! HTTP request handlers.

pub mod application_handler;
pub mod auth_handler;

pub use application_handler::application_routes;
pub use auth_handler::auth_routes;
