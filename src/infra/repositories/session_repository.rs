//! Refresh session repository.
//!
//! One row per live refresh token. Rotation deletes the old row and
//! inserts the replacement; a reused token finds no row and is rejected.


use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::refresh_session::{self, ActiveModel, Entity as SessionEntity};
use crate::domain::RefreshSession;
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Refresh session repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a session row for a newly issued refresh token
    async fn create(
        &self,
        id: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshSession>;

    /// Find a session by its id (the token's `jti` claim)
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RefreshSession>>;

    /// Delete a session. Returns false when the row was already gone,
    /// which callers treat as a revoked token.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Revoke every session belonging to a user. Returns the number
    /// of sessions removed.
    async fn delete_for_user(&self, user_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of SessionRepository backed by SeaORM
pub struct SessionStore {
    db: Arc<DatabaseConnection>,
}

impl SessionStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for SessionStore {
    async fn create(
        &self,
        id: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshSession> {
        let active_model = ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now()),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(RefreshSession::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RefreshSession>> {
        let result = SessionEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(RefreshSession::from))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = SessionEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = SessionEntity::delete_many()
            .filter(refresh_session::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
