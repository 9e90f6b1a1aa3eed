//! Authentication handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::{LoginResponse, TokenPair};
use crate::types::MessageResponse;

/// Registration and login request (same shape for both)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

/// Email verification query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct VerifyEmailQuery {
    /// One-time verification token from the emailed link
    pub token: Option<String>,
}

/// Refresh token request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Password reset request (step one)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RequestPasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
}

/// Password reset completion (step two)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// One-time reset token from the emailed link
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,
    /// New password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub new_password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/verify-email", get(verify_email))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/request-password-reset", post(request_password_reset))
        .route("/reset-password", post(reset_password))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User registered, verification email sent", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .auth_service
        .register(payload.email, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Verify an email address with an emailed token
#[utoipa::path(
    get,
    path = "/api/auth/verify-email",
    tag = "Authentication",
    params(VerifyEmailQuery),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Missing or invalid verification token")
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> AppResult<Json<MessageResponse>> {
    let token = query.token.unwrap_or_default();
    state.auth_service.verify_email(&token).await?;

    Ok(Json(MessageResponse::new("Email verified")))
}

/// Login and get an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(response))
}

/// Rotate a refresh token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair issued", body = TokenPair),
        (status = 401, description = "Invalid, expired or already-rotated refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> AppResult<Json<TokenPair>> {
    let pair = state.auth_service.refresh(&payload.refresh_token).await?;

    Ok(Json(pair))
}

/// Request a password reset email
#[utoipa::path(
    post,
    path = "/api/auth/request-password-reset",
    tag = "Authentication",
    request_body = RequestPasswordResetRequest,
    responses(
        (status = 200, description = "Reset email sent if the account exists", body = MessageResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RequestPasswordResetRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.auth_service.request_password_reset(payload.email).await?;

    Ok(Json(MessageResponse::new("If account exists, reset email sent")))
}

/// Complete a password reset
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset, all sessions revoked", body = MessageResponse),
        (status = 400, description = "Missing or invalid reset token")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .reset_password(&payload.token, payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password reset complete")))
}
