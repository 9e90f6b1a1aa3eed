//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{application_handler, auth_handler};
use crate::domain::{
    AdminUserResponse, ApplicationStatus, JobApplication, MonthlyCount, SortField, SortOrder,
    StatusCount, UserResponse, UserRole,
};
use crate::services::{AnalyticsResponse, LoginResponse, TokenPair};
use crate::types::MessageResponse;

/// OpenAPI documentation for the Job Tracker API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Tracker API",
        version = "0.1.0",
        description = "Job application tracker with email-verified accounts and JWT auth"
    ),
    servers(
        (url = "http://localhost:4000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::verify_email,
        auth_handler::login,
        auth_handler::refresh,
        auth_handler::request_password_reset,
        auth_handler::reset_password,
        // Application endpoints
        application_handler::create_application,
        application_handler::list_applications,
        application_handler::analytics,
        application_handler::update_application,
        application_handler::delete_application,
        application_handler::admin_users,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            AdminUserResponse,
            ApplicationStatus,
            JobApplication,
            SortField,
            SortOrder,
            StatusCount,
            MonthlyCount,
            // Auth types
            auth_handler::CredentialsRequest,
            auth_handler::RefreshRequest,
            auth_handler::RequestPasswordResetRequest,
            auth_handler::ResetPasswordRequest,
            LoginResponse,
            TokenPair,
            // Application handler types
            application_handler::CreateApplicationRequest,
            application_handler::UpdateApplicationRequest,
            AnalyticsResponse,
            // Shared types
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, verification, login and token lifecycle"),
        (name = "Applications", description = "Job application tracking and analytics")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
