//! Job application service - CRUD, analytics and the admin user
//! directory. All per-user operations are ownership-scoped.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AdminUserResponse, ApplicationFilter, ApplicationUpdate, JobApplication, MonthlyCount,
    NewApplication, StatusCount,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{ApplicationRepository, UserRepository};
use crate::types::{Paginated, PaginationParams};

/// Aggregated view of a user's pipeline
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub by_status: Vec<StatusCount>,
    /// Per-month counts of `applied_date`, oldest first
    pub monthly: Vec<MonthlyCount>,
}

/// Job application service trait for dependency injection.
#[async_trait]
pub trait ApplicationService: Send + Sync {
    /// Create an application owned by the given user
    async fn create_application(
        &self,
        user_id: Uuid,
        data: NewApplication,
    ) -> AppResult<JobApplication>;

    /// List the user's applications with filtering, sorting and pagination
    async fn list_applications(
        &self,
        user_id: Uuid,
        filter: ApplicationFilter,
    ) -> AppResult<Paginated<JobApplication>>;

    /// Partially update an owned application
    async fn update_application(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: ApplicationUpdate,
    ) -> AppResult<JobApplication>;

    /// Delete an owned application
    async fn delete_application(&self, user_id: Uuid, id: Uuid) -> AppResult<()>;

    /// Status and monthly aggregates for the user's applications
    async fn get_analytics(&self, user_id: Uuid) -> AppResult<AnalyticsResponse>;

    /// Paginated user directory with application counts (admin only;
    /// role enforcement happens in the route layer)
    async fn list_users_for_admin(
        &self,
        params: PaginationParams,
    ) -> AppResult<Paginated<AdminUserResponse>>;
}

/// Concrete implementation of ApplicationService.
pub struct JobBoard {
    applications: Arc<dyn ApplicationRepository>,
    users: Arc<dyn UserRepository>,
}

impl JobBoard {
    /// Create new application service instance
    pub fn new(applications: Arc<dyn ApplicationRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            applications,
            users,
        }
    }
}

#[async_trait]
impl ApplicationService for JobBoard {
    async fn create_application(
        &self,
        user_id: Uuid,
        data: NewApplication,
    ) -> AppResult<JobApplication> {
        let application = self.applications.create(user_id, data).await?;
        tracing::info!(application_id = %application.id, %user_id, "Application created");
        Ok(application)
    }

    async fn list_applications(
        &self,
        user_id: Uuid,
        filter: ApplicationFilter,
    ) -> AppResult<Paginated<JobApplication>> {
        let page = filter.page;
        let per_page = filter.per_page;
        let (items, total) = self.applications.list(user_id, filter).await?;
        Ok(Paginated::new(items, page, per_page, total))
    }

    async fn update_application(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: ApplicationUpdate,
    ) -> AppResult<JobApplication> {
        if update.is_empty() {
            return Err(AppError::validation("No fields provided for update"));
        }
        self.applications.update(user_id, id, update).await
    }

    async fn delete_application(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        self.applications.delete(user_id, id).await?;
        tracing::info!(application_id = %id, %user_id, "Application deleted");
        Ok(())
    }

    async fn get_analytics(&self, user_id: Uuid) -> AppResult<AnalyticsResponse> {
        let by_status = self.applications.count_by_status(user_id).await?;
        let monthly = self.applications.count_by_month(user_id).await?;
        Ok(AnalyticsResponse { by_status, monthly })
    }

    async fn list_users_for_admin(
        &self,
        params: PaginationParams,
    ) -> AppResult<Paginated<AdminUserResponse>> {
        let page = params.page();
        let per_page = params.page_size();

        let (users, total) = self.users.list_paginated(page, per_page).await?;
        let counts = self
            .applications
            .count_for_users(users.iter().map(|u| u.id).collect())
            .await?;

        let items = users
            .into_iter()
            .map(|user| {
                let count = counts.get(&user.id).copied().unwrap_or(0);
                AdminUserResponse::new(user, count)
            })
            .collect();

        Ok(Paginated::new(items, page, per_page, total))
    }
}
