//! Job application handlers.
//!
//! All routes here sit behind the auth middleware; handlers read the
//! CurrentUser from request extensions and scope every query to it.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    AdminUserResponse, ApplicationFilter, ApplicationStatus, ApplicationUpdate, JobApplication,
    NewApplication, SortField, SortOrder,
};
use crate::errors::AppResult;
use crate::services::AnalyticsResponse;
use crate::types::{Paginated, PaginationParams};

/// Create application request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateApplicationRequest {
    #[validate(length(min = 1, message = "Company is required"))]
    #[schema(example = "Acme Corp")]
    pub company: String,
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Backend Engineer")]
    pub title: String,
    /// Defaults to APPLIED when omitted
    pub status: Option<ApplicationStatus>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Partial update request; at least one field must be present
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateApplicationRequest {
    #[validate(length(min = 1, message = "Company cannot be empty"))]
    pub company: Option<String>,
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListApplicationsQuery {
    /// Filter by pipeline status
    pub status: Option<ApplicationStatus>,
    /// Case-insensitive substring match on company
    pub company: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    /// Page number, 1-based
    pub page: Option<u64>,
    /// Items per page, capped at 50
    pub page_size: Option<u64>,
}

impl ListApplicationsQuery {
    fn into_filter(self) -> ApplicationFilter {
        let pagination = PaginationParams {
            page: self.page,
            page_size: self.page_size,
        };
        ApplicationFilter {
            status: self.status,
            company: self.company,
            sort_by: self.sort_by.unwrap_or_default(),
            sort_order: self.sort_order.unwrap_or_default(),
            page: pagination.page(),
            per_page: pagination.page_size(),
        }
    }
}

/// Create application routes (mounted behind the auth middleware)
pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_application).get(list_applications))
        .route("/analytics", get(analytics))
        .route("/:id", put(update_application).delete(delete_application))
        .route("/admin/users", get(admin_users))
}

/// Create a job application
#[utoipa::path(
    post,
    path = "/api/applications",
    tag = "Applications",
    request_body = CreateApplicationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Application created", body = JobApplication),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid access token")
    )
)]
pub async fn create_application(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateApplicationRequest>,
) -> AppResult<(StatusCode, Json<JobApplication>)> {
    let data = NewApplication {
        company: payload.company,
        title: payload.title,
        status: payload.status.unwrap_or_default(),
        location: payload.location,
        notes: payload.notes,
    };

    let application = state
        .application_service
        .create_application(user.id, data)
        .await?;

    Ok((StatusCode::CREATED, Json(application)))
}

/// List the current user's applications
#[utoipa::path(
    get,
    path = "/api/applications",
    tag = "Applications",
    params(ListApplicationsQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Page of applications with pagination metadata", body = Vec<JobApplication>),
        (status = 401, description = "Missing or invalid access token")
    )
)]
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListApplicationsQuery>,
) -> AppResult<Json<Paginated<JobApplication>>> {
    let page = state
        .application_service
        .list_applications(user.id, query.into_filter())
        .await?;

    Ok(Json(page))
}

/// Pipeline analytics for the current user
#[utoipa::path(
    get,
    path = "/api/applications/analytics",
    tag = "Applications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status and monthly aggregates", body = AnalyticsResponse),
        (status = 401, description = "Missing or invalid access token")
    )
)]
pub async fn analytics(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AnalyticsResponse>> {
    let analytics = state.application_service.get_analytics(user.id).await?;

    Ok(Json(analytics))
}

/// Update a job application
#[utoipa::path(
    put,
    path = "/api/applications/{id}",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "Application id")),
    request_body = UpdateApplicationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Application updated", body = JobApplication),
        (status = 400, description = "Validation error or empty update"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Application not found or owned by another user")
    )
)]
pub async fn update_application(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateApplicationRequest>,
) -> AppResult<Json<JobApplication>> {
    let update = ApplicationUpdate {
        company: payload.company,
        title: payload.title,
        status: payload.status,
        location: payload.location,
        notes: payload.notes,
    };

    let application = state
        .application_service
        .update_application(user.id, id, update)
        .await?;

    Ok(Json(application))
}

/// Delete a job application
#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "Application id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Application not found or owned by another user")
    )
)]
pub async fn delete_application(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .application_service
        .delete_application(user.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List all users with application counts (admin only)
#[utoipa::path(
    get,
    path = "/api/applications/admin/users",
    tag = "Applications",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Page of users with pagination metadata", body = Vec<AdminUserResponse>),
        (status = 401, description = "Missing or invalid access token"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn admin_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AdminUserResponse>>> {
    require_admin(&user)?;

    let page = state
        .application_service
        .list_users_for_admin(params)
        .await?;

    Ok(Json(page))
}
