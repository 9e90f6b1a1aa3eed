//! Job application repository.
//!
//! Every query is scoped to the owning user; an application belonging
//! to someone else behaves exactly like a missing row.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::job_application::{self, ActiveModel, Entity as ApplicationEntity};
use crate::domain::{
    ApplicationFilter, ApplicationStatus, ApplicationUpdate, JobApplication, MonthlyCount,
    NewApplication, SortField, SortOrder, StatusCount,
};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(test)]
use mockall::automock;

/// Job application repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Create an application owned by the given user
    async fn create(&self, user_id: Uuid, data: NewApplication) -> AppResult<JobApplication>;

    /// List a user's applications with filtering, sorting and pagination.
    /// Returns the page of applications plus the total matching count.
    async fn list(
        &self,
        user_id: Uuid,
        filter: ApplicationFilter,
    ) -> AppResult<(Vec<JobApplication>, u64)>;

    /// Partially update an owned application; NotFound when the id does
    /// not exist or belongs to another user
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: ApplicationUpdate,
    ) -> AppResult<JobApplication>;

    /// Delete an owned application; NotFound when the id does not exist
    /// or belongs to another user
    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<()>;

    /// Count a user's applications grouped by status
    async fn count_by_status(&self, user_id: Uuid) -> AppResult<Vec<StatusCount>>;

    /// Count a user's applications grouped by month of `applied_date`,
    /// ascending
    async fn count_by_month(&self, user_id: Uuid) -> AppResult<Vec<MonthlyCount>>;

    /// Application counts for a set of users (admin directory)
    async fn count_for_users(&self, user_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, u64>>;
}

#[derive(FromQueryResult)]
struct StatusCountRow {
    status: String,
    count: i64,
}

#[derive(FromQueryResult)]
struct MonthlyCountRow {
    month: String,
    count: i64,
}

#[derive(FromQueryResult)]
struct UserCountRow {
    user_id: Uuid,
    count: i64,
}

/// Concrete implementation of ApplicationRepository backed by SeaORM
pub struct ApplicationStore {
    db: Arc<DatabaseConnection>,
}

impl ApplicationStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Postgres expression truncating `applied_date` to a `YYYY-MM` label
    fn month_expr() -> SimpleExpr {
        Expr::cust("to_char(date_trunc('month', applied_date), 'YYYY-MM')")
    }

    fn sort_column(field: SortField) -> job_application::Column {
        match field {
            SortField::CreatedAt => job_application::Column::CreatedAt,
            SortField::AppliedDate => job_application::Column::AppliedDate,
            SortField::Company => job_application::Column::Company,
            SortField::Status => job_application::Column::Status,
            SortField::Title => job_application::Column::Title,
        }
    }
}

#[async_trait]
impl ApplicationRepository for ApplicationStore {
    async fn create(&self, user_id: Uuid, data: NewApplication) -> AppResult<JobApplication> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            company: Set(data.company),
            title: Set(data.title),
            status: Set(data.status.as_str().to_string()),
            location: Set(data.location),
            notes: Set(data.notes),
            applied_date: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(JobApplication::from(model))
    }

    async fn list(
        &self,
        user_id: Uuid,
        filter: ApplicationFilter,
    ) -> AppResult<(Vec<JobApplication>, u64)> {
        let mut query =
            ApplicationEntity::find().filter(job_application::Column::UserId.eq(user_id));

        if let Some(status) = filter.status {
            query = query.filter(job_application::Column::Status.eq(status.as_str()));
        }
        if let Some(company) = &filter.company {
            query = query.filter(
                Expr::col(job_application::Column::Company).ilike(format!("%{}%", company)),
            );
        }

        let order = match filter.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        query = query.order_by(Self::sort_column(filter.sort_by), order);

        let paginator = query.paginate(self.db.as_ref(), filter.per_page);
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(filter.page.saturating_sub(1))
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(JobApplication::from).collect(), total))
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: ApplicationUpdate,
    ) -> AppResult<JobApplication> {
        let model = ApplicationEntity::find_by_id(id)
            .filter(job_application::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = model.into();
        if let Some(company) = update.company {
            active.company = Set(company);
        }
        if let Some(title) = update.title {
            active.title = Set(title);
        }
        if let Some(status) = update.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(location) = update.location {
            active.location = Set(Some(location));
        }
        if let Some(notes) = update.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(JobApplication::from(model))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        let result = ApplicationEntity::delete_many()
            .filter(job_application::Column::Id.eq(id))
            .filter(job_application::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count_by_status(&self, user_id: Uuid) -> AppResult<Vec<StatusCount>> {
        let rows = ApplicationEntity::find()
            .select_only()
            .column(job_application::Column::Status)
            .column_as(job_application::Column::Id.count(), "count")
            .filter(job_application::Column::UserId.eq(user_id))
            .group_by(job_application::Column::Status)
            .into_model::<StatusCountRow>()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| StatusCount {
                status: ApplicationStatus::from(row.status.as_str()),
                count: row.count as u64,
            })
            .collect())
    }

    async fn count_by_month(&self, user_id: Uuid) -> AppResult<Vec<MonthlyCount>> {
        let rows = ApplicationEntity::find()
            .select_only()
            .column_as(Self::month_expr(), "month")
            .column_as(job_application::Column::Id.count(), "count")
            .filter(job_application::Column::UserId.eq(user_id))
            .group_by(Self::month_expr())
            .order_by(Self::month_expr(), Order::Asc)
            .into_model::<MonthlyCountRow>()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| MonthlyCount {
                month: row.month,
                count: row.count as u64,
            })
            .collect())
    }

    async fn count_for_users(&self, user_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, u64>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = ApplicationEntity::find()
            .select_only()
            .column(job_application::Column::UserId)
            .column_as(job_application::Column::Id.count(), "count")
            .filter(job_application::Column::UserId.is_in(user_ids))
            .group_by(job_application::Column::UserId)
            .into_model::<UserCountRow>()
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.user_id, row.count as u64))
            .collect())
    }
}
